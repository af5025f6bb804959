//! Byte-oriented transports the codec reads from and writes to.

use std::io::{Read, Write};

use serialport::SerialPort;

pub use memory::MemoryTransport;

use crate::serial_port::SerialPortImpl;

mod memory;

/// A byte-oriented channel, e.g. a serial link.
pub trait Transport {
    /// Writes a single byte.
    ///
    /// # Errors
    ///
    /// Returns an [`std::io::Error`] if the write fails.
    fn write_byte(&mut self, byte: u8) -> std::io::Result<()>;

    /// Returns the amount of bytes that can be read without blocking.
    ///
    /// # Errors
    ///
    /// Returns an [`std::io::Error`] if the amount cannot be determined.
    fn available(&mut self) -> std::io::Result<usize>;

    /// Reads a single byte that is known to be available.
    ///
    /// # Errors
    ///
    /// Returns an [`std::io::Error`] if the read fails.
    fn read_byte(&mut self) -> std::io::Result<u8>;

    /// Flushes any buffered output.
    ///
    /// # Errors
    ///
    /// Returns an [`std::io::Error`] if the flush fails.
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<T> Transport for &mut T
where
    T: Transport + ?Sized,
{
    fn write_byte(&mut self, byte: u8) -> std::io::Result<()> {
        (**self).write_byte(byte)
    }

    fn available(&mut self) -> std::io::Result<usize> {
        (**self).available()
    }

    fn read_byte(&mut self) -> std::io::Result<u8> {
        (**self).read_byte()
    }

    fn flush(&mut self) -> std::io::Result<()> {
        (**self).flush()
    }
}

fn write_byte<T>(port: &mut T, byte: u8) -> std::io::Result<()>
where
    T: Write + ?Sized,
{
    port.write_all(&[byte])
}

fn available<T>(port: &T) -> std::io::Result<usize>
where
    T: SerialPort + ?Sized,
{
    Ok(port.bytes_to_read()? as usize)
}

fn read_byte<T>(port: &mut T) -> std::io::Result<u8>
where
    T: Read + ?Sized,
{
    let mut byte = [0];
    port.read_exact(&mut byte)?;
    Ok(byte[0])
}

impl Transport for SerialPortImpl {
    fn write_byte(&mut self, byte: u8) -> std::io::Result<()> {
        write_byte(self, byte)
    }

    fn available(&mut self) -> std::io::Result<usize> {
        available(&*self)
    }

    fn read_byte(&mut self) -> std::io::Result<u8> {
        read_byte(self)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Write::flush(self)
    }
}

impl Transport for Box<dyn SerialPort> {
    fn write_byte(&mut self, byte: u8) -> std::io::Result<()> {
        write_byte(&mut **self, byte)
    }

    fn available(&mut self) -> std::io::Result<usize> {
        available(&**self)
    }

    fn read_byte(&mut self) -> std::io::Result<u8> {
        read_byte(&mut **self)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Write::flush(&mut **self)
    }
}
