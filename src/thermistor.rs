//! NTC thermistor temperature sensor
//!
//! The thermistor sits in a voltage divider with a fixed series resistor. The divider is only
//! powered while sampling. Temperature is computed from the averaged reading with the
//! B-parameter form of the Steinhart-Hart equation.
//!
//! The default full scale is the CC430's 12-bit `0xFFF`. When sampling through the C5535 SAR
//! ([`Sar::input`](crate::sar::Sar::input)) set `full_scale` to
//! [`sar::FULL_SCALE`](crate::sar::FULL_SCALE).

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use libm::logf;

const KELVIN_OFFSET: f32 = 273.15;

/// Anything that can produce a raw analog sample
pub trait AnalogSource {
    /// Sampling error
    type Error;

    /// Take one sample
    fn sample(&mut self) -> Result<u16, Self::Error>;
}

/// Thermistor circuit parameters.
///
/// Default: 10 kOhm at 25 C with B = 3380, 10 kOhm series resistor, 12-bit converter, five
/// samples 10 ms apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermistorConfig {
    /// Thermistor resistance at the nominal temperature, in ohms
    pub nominal_resistance: f32,
    /// Nominal temperature in degrees Celsius
    pub nominal_temperature: f32,
    /// B coefficient
    pub b_coefficient: f32,
    /// Series resistor, in ohms
    pub series_resistor: f32,
    /// Full scale reading of the converter
    pub full_scale: u16,
    /// Samples averaged per reading
    pub samples: u8,
    /// Delay between powering the divider and the first sample
    pub settle_ms: u32,
    /// Delay after each sample
    pub sample_interval_ms: u32,
}

impl Default for ThermistorConfig {
    fn default() -> Self {
        ThermistorConfig {
            nominal_resistance: 10_000.0,
            nominal_temperature: 25.0,
            b_coefficient: 3380.0,
            series_resistor: 10_000.0,
            full_scale: 0xFFF,
            samples: 5,
            settle_ms: 10,
            sample_interval_ms: 10,
        }
    }
}

/// Thermistor errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThermistorError<E> {
    /// The analog source failed
    Adc(E),
    /// The power pin could not be driven
    Pin,
    /// Average reading of zero, the thermistor is disconnected
    OpenCircuit,
    /// Average reading at full scale, the thermistor is shorted
    ShortCircuit,
}

/// Thermistor powered through `P` and sampled through `A`
pub struct Thermistor<A: AnalogSource, P: OutputPin, D: DelayNs> {
    adc: A,
    power: P,
    delay: D,
    config: ThermistorConfig,
}

impl<A: AnalogSource, P: OutputPin, D: DelayNs> Thermistor<A, P, D> {
    /// Create a sensor with the default circuit parameters
    pub fn new(adc: A, power: P, delay: D) -> Self {
        Thermistor {
            adc,
            power,
            delay,
            config: ThermistorConfig::default(),
        }
    }

    /// Replace the circuit parameters
    #[inline]
    pub fn with_config(mut self, config: ThermistorConfig) -> Self {
        self.config = config;
        self
    }

    /// Release the sample source, power pin and delay
    #[inline]
    pub fn free(self) -> (A, P, D) {
        (self.adc, self.power, self.delay)
    }

    /// Leave the divider unpowered until the first reading
    pub fn init(&mut self) -> Result<(), ThermistorError<A::Error>> {
        self.power.set_low().map_err(|_| ThermistorError::Pin)
    }

    /// Temperature in tenths of a degree Celsius
    pub fn read(&mut self) -> Result<i16, ThermistorError<A::Error>> {
        self.power.set_high().map_err(|_| ThermistorError::Pin)?;
        self.delay.delay_ms(self.config.settle_ms);

        let count = self.config.samples.max(1);
        let mut sum: u32 = 0;
        for _ in 0..count {
            match self.adc.sample() {
                Ok(sample) => sum += u32::from(sample),
                Err(e) => {
                    self.power.set_low().ok();
                    return Err(ThermistorError::Adc(e));
                }
            }
            self.delay.delay_ms(self.config.sample_interval_ms);
        }

        self.power.set_low().map_err(|_| ThermistorError::Pin)?;

        let average = sum as f32 / f32::from(count);
        self.celsius_tenths(average)
    }

    fn celsius_tenths(&self, average: f32) -> Result<i16, ThermistorError<A::Error>> {
        let cfg = &self.config;
        let full_scale = f32::from(cfg.full_scale);
        if average <= 0.0 {
            return Err(ThermistorError::OpenCircuit);
        }
        if average >= full_scale {
            return Err(ThermistorError::ShortCircuit);
        }

        let resistance = cfg.series_resistor * (full_scale / average - 1.0);

        let mut steinhart = logf(resistance / cfg.nominal_resistance) / cfg.b_coefficient;
        steinhart += 1.0 / (cfg.nominal_temperature + KELVIN_OFFSET);
        let celsius = 1.0 / steinhart - KELVIN_OFFSET;

        Ok((celsius * 10.0) as i16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::{ErrorKind, ErrorType};

    struct Samples {
        values: Vec<u16>,
        taken: usize,
        fail_at: Option<usize>,
    }

    impl Samples {
        fn constant(value: u16) -> Self {
            Samples {
                values: vec![value],
                taken: 0,
                fail_at: None,
            }
        }
    }

    impl AnalogSource for Samples {
        type Error = &'static str;

        fn sample(&mut self) -> Result<u16, Self::Error> {
            if self.fail_at == Some(self.taken) {
                return Err("adc");
            }
            let value = self.values[self.taken % self.values.len()];
            self.taken += 1;
            Ok(value)
        }
    }

    #[derive(Default)]
    struct PowerPin {
        states: Vec<bool>,
    }

    impl ErrorType for PowerPin {
        type Error = Infallible;
    }

    impl OutputPin for PowerPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.states.push(false);
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.states.push(true);
            Ok(())
        }
    }

    struct BrokenPin;

    impl ErrorType for BrokenPin {
        type Error = ErrorKind;
    }

    impl OutputPin for BrokenPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            Err(ErrorKind::Other)
        }
        fn set_high(&mut self) -> Result<(), Self::Error> {
            Err(ErrorKind::Other)
        }
    }

    #[derive(Default)]
    struct Delays {
        ms: Vec<u32>,
    }

    impl DelayNs for Delays {
        fn delay_ns(&mut self, _ns: u32) {}

        fn delay_ms(&mut self, ms: u32) {
            self.ms.push(ms);
        }
    }

    fn read_constant(value: u16) -> Result<i16, ThermistorError<&'static str>> {
        Thermistor::new(Samples::constant(value), PowerPin::default(), Delays::default()).read()
    }

    #[test]
    fn readings_convert_to_tenths_of_a_degree() {
        assert_eq!(read_constant(1365), Ok(78));
        assert_eq!(read_constant(3000), Ok(540));
        assert_eq!(read_constant(1000), Ok(-20));
    }

    #[test]
    fn samples_are_averaged() {
        let adc = Samples {
            values: vec![1000, 2000, 1000, 2000, 1000],
            taken: 0,
            fail_at: None,
        };
        let mut sensor = Thermistor::new(adc, PowerPin::default(), Delays::default());
        // Average of 1400 lies between the 1365 and 2048 readings
        let t = sensor.read().unwrap();
        assert!((79..250).contains(&t), "{t}");
        assert_eq!(sensor.free().0.taken, 5);
    }

    #[test]
    fn divider_is_powered_only_while_sampling() {
        let mut sensor =
            Thermistor::new(Samples::constant(2000), PowerPin::default(), Delays::default());
        sensor.init().unwrap();
        sensor.read().unwrap();
        let (adc, pin, delay) = sensor.free();
        assert_eq!(pin.states, [false, true, false]);
        assert_eq!(delay.ms, [10; 6]);
        assert_eq!(adc.taken, 5);
    }

    #[test]
    fn adc_failure_powers_down() {
        let adc = Samples {
            values: vec![2000],
            taken: 0,
            fail_at: Some(2),
        };
        let mut sensor = Thermistor::new(adc, PowerPin::default(), Delays::default());
        assert_eq!(sensor.read(), Err(ThermistorError::Adc("adc")));
        assert_eq!(sensor.free().1.states, [true, false]);
    }

    #[test]
    fn rail_readings_are_faults() {
        assert_eq!(read_constant(0), Err(ThermistorError::OpenCircuit));
        assert_eq!(read_constant(0xFFF), Err(ThermistorError::ShortCircuit));
    }

    #[test]
    fn pin_failure() {
        let mut sensor = Thermistor::new(Samples::constant(2000), BrokenPin, Delays::default());
        assert_eq!(sensor.read(), Err(ThermistorError::Pin));
    }

    #[test]
    fn custom_full_scale() {
        let sensor = Thermistor::new(Samples::constant(0), PowerPin::default(), Delays::default())
            .with_config(ThermistorConfig {
                full_scale: 0x3FF,
                ..Default::default()
            });
        // 10-bit midpoint puts the thermistor at its nominal resistance
        let t = sensor.celsius_tenths(511.5).unwrap();
        assert!((249..=250).contains(&t), "{t}");
    }

    #[test]
    fn sampled_through_the_sar() {
        use crate::mock::FakeCsl;
        use crate::sar::{self, AnalogPin, Sar};

        let ten_bit = ThermistorConfig {
            full_scale: sar::FULL_SCALE,
            ..Default::default()
        };

        let mut converter = Sar::new(FakeCsl {
            sample: 512,
            ..Default::default()
        });
        let mut sensor = Thermistor::new(
            converter.input(AnalogPin::A1),
            PowerPin::default(),
            Delays::default(),
        )
        .with_config(ten_bit);
        let t = sensor.read().unwrap();
        assert!((249..=251).contains(&t), "{t}");

        let mut converter = Sar::new(FakeCsl {
            sample: sar::FULL_SCALE,
            ..Default::default()
        });
        let mut sensor = Thermistor::new(
            converter.input(AnalogPin::A1),
            PowerPin::default(),
            Delays::default(),
        )
        .with_config(ten_bit);
        assert_eq!(sensor.read(), Err(ThermistorError::ShortCircuit));
    }
}
