//! Bus transport contract used by the drivers.
//!
//! Drivers only ever push command bytes and data bytes; whether those travel over
//! 4-wire SPI with a D/C pin, I2C control bytes, a UART or a parallel bus is the
//! transport's business. Concrete transports come from `display-interface`
//! implementations and are wrapped in [`DiTransport`].

use core::fmt::Debug;

use display_interface::{DataFormat, DisplayError, WriteOnlyDataCommand};

pub trait DisplayTransport {
    type Error: Debug;

    /// Send one command byte.
    fn write_command(&mut self, command: u8) -> Result<(), Self::Error>;

    /// Send a command byte followed by its parameter bytes.
    fn write_command_with_params(&mut self, command: u8, params: &[u8]) -> Result<(), Self::Error> {
        self.write_command(command)?;
        if params.is_empty() {
            return Ok(());
        }
        self.write_data(params)
    }

    /// Send display data (RAM contents).
    fn write_data(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Read one status byte. Write-only buses return `Ok(None)`.
    fn read(&mut self) -> Result<Option<u8>, Self::Error> {
        Ok(None)
    }
}

impl<T: DisplayTransport + ?Sized> DisplayTransport for &mut T {
    type Error = T::Error;

    fn write_command(&mut self, command: u8) -> Result<(), Self::Error> {
        (**self).write_command(command)
    }

    fn write_command_with_params(&mut self, command: u8, params: &[u8]) -> Result<(), Self::Error> {
        (**self).write_command_with_params(command, params)
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write_data(data)
    }

    fn read(&mut self) -> Result<Option<u8>, Self::Error> {
        (**self).read()
    }
}

/// Adapts any `display-interface` implementation (SPI, I2C, parallel GPIO).
pub struct DiTransport<DI> {
    di: DI,
}

impl<DI: WriteOnlyDataCommand> DiTransport<DI> {
    pub fn new(di: DI) -> Self {
        Self { di }
    }

    pub fn release(self) -> DI {
        self.di
    }
}

impl<DI: WriteOnlyDataCommand> DisplayTransport for DiTransport<DI> {
    type Error = DisplayError;

    fn write_command(&mut self, command: u8) -> Result<(), DisplayError> {
        self.di.send_commands(DataFormat::U8(&[command]))
    }

    // Params travel in command mode: SSD1306-style controllers expect the
    // arguments of a command on the command channel (D/C low, control byte 0x00).
    fn write_command_with_params(&mut self, command: u8, params: &[u8]) -> Result<(), DisplayError> {
        self.di.send_commands(DataFormat::U8(&[command]))?;
        if params.is_empty() {
            return Ok(());
        }
        self.di.send_commands(DataFormat::U8(params))
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        self.di.send_data(DataFormat::U8(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    #[derive(Debug, PartialEq)]
    enum Sent {
        Cmd(Vec<u8>),
        Data(Vec<u8>),
    }

    #[derive(Default)]
    struct RecordingDi {
        sent: Vec<Sent>,
    }

    fn bytes(fmt: DataFormat<'_>) -> Result<Vec<u8>, DisplayError> {
        match fmt {
            DataFormat::U8(b) => Ok(b.to_vec()),
            _ => Err(DisplayError::DataFormatNotImplemented),
        }
    }

    impl WriteOnlyDataCommand for RecordingDi {
        fn send_commands(&mut self, cmd: DataFormat<'_>) -> Result<(), DisplayError> {
            let b = bytes(cmd)?;
            self.sent.push(Sent::Cmd(b));
            Ok(())
        }

        fn send_data(&mut self, buf: DataFormat<'_>) -> Result<(), DisplayError> {
            let b = bytes(buf)?;
            self.sent.push(Sent::Data(b));
            Ok(())
        }
    }

    #[test]
    fn commands_and_data_keep_their_channel() {
        let mut t = DiTransport::new(RecordingDi::default());
        t.write_command(0xAF).unwrap();
        t.write_command_with_params(0x21, &[0, 127]).unwrap();
        t.write_data(&[1, 2, 3]).unwrap();
        // DisplayError has no PartialEq
        assert!(matches!(t.read(), Ok(None)));

        let di = t.release();
        assert_eq!(
            di.sent,
            [
                Sent::Cmd(vec![0xAF]),
                Sent::Cmd(vec![0x21]),
                Sent::Cmd(vec![0, 127]),
                Sent::Data(vec![1, 2, 3]),
            ]
        );
    }

    #[test]
    fn default_params_go_out_as_data() {
        #[derive(Default)]
        struct Raw(Vec<(bool, u8)>);

        impl DisplayTransport for Raw {
            type Error = ();
            fn write_command(&mut self, command: u8) -> Result<(), ()> {
                self.0.push((true, command));
                Ok(())
            }
            fn write_data(&mut self, data: &[u8]) -> Result<(), ()> {
                self.0.extend(data.iter().map(|&b| (false, b)));
                Ok(())
            }
        }

        let mut raw = Raw::default();
        raw.write_command_with_params(0x1F, &[0x28]).unwrap();
        raw.write_command_with_params(0x0C, &[]).unwrap();
        assert_eq!(raw.0, [(true, 0x1F), (false, 0x28), (true, 0x0C)]);
    }
}
