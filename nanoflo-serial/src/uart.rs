use std::ffi::CString;
use std::io;
use std::os::unix::prelude::{AsRawFd, OsStrExt, RawFd};
use std::path::Path;

use termios::{cfsetspeed, tcflush, tcsetattr, Termios};

use crate::baud::BaudRate;

/// An open, configured, non-blocking TTY.
///
/// Opened `O_NONBLOCK`: reads return `WouldBlock` rather than stalling the
/// scheduler loop when nothing is waiting, which is what lets
/// `Uart::poll_byte` be called every tick without its own buffering thread.
/// Closed on drop.
pub struct Uart(RawFd);

impl Uart {
    /// Open `path` with the most common UART settings: 8 data bits, no
    /// parity, one stop bit, no flow control.
    pub fn open(path: &Path, baud_rate: BaudRate) -> io::Result<Self> {
        use libc::{O_NONBLOCK, O_RDWR};

        let cstr = CString::new(path.as_os_str().as_bytes())
            .map_err(|_| io::Error::from(io::ErrorKind::InvalidInput))?;

        let fd = unsafe { libc::open(cstr.as_ptr(), O_RDWR | O_NONBLOCK, 0) };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }

        match Self::configure(fd, baud_rate) {
            Ok(()) => Ok(Self(fd)),
            Err(e) => {
                unsafe { libc::close(fd) };
                Err(e)
            }
        }
    }

    fn configure(fd: RawFd, baud_rate: BaudRate) -> io::Result<()> {
        use libc::{
            CLOCAL, CREAD, CS8, CSIZE, CSTOPB, ECHO, ECHOE, ECHOK, ECHONL, ICANON, ICRNL, IEXTEN,
            IGNBRK, IGNCR, INLCR, INPCK, ISIG, IXOFF, IXON, OPOST, PARENB, VMIN, VTIME,
        };

        let mut termios = Termios::from_fd(fd)?;

        termios.c_iflag &= !(INLCR | IGNCR | ICRNL | IGNBRK | IXON | IXOFF | INPCK);
        termios.c_oflag &= !OPOST;
        termios.c_cflag &= !(CSIZE | CSTOPB | PARENB);
        termios.c_cflag |= CREAD | CLOCAL | CS8;
        termios.c_lflag &= !(ICANON | ECHO | ECHOE | ECHOK | ECHONL | ISIG | IEXTEN);

        termios.c_cc[VMIN] = 0;
        termios.c_cc[VTIME] = 0;

        let baud = baud_constant(baud_rate);
        cfsetspeed(&mut termios, baud)?;

        tcsetattr(fd, libc::TCSANOW, &termios)?;
        tcflush(fd, libc::TCIOFLUSH)?;
        Ok(())
    }

    /// Read one byte, or `None` if none is currently available.
    pub fn poll_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match io::Read::read(self, &mut byte) {
            Ok(1) => Some(byte[0]),
            Ok(_) => None,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => None,
            Err(e) => {
                log::warn!("nanoflo-serial: read failed: {e}");
                None
            }
        }
    }

    pub fn write_all_lossy(&mut self, bytes: &[u8]) {
        if let Err(e) = io::Write::write_all(self, bytes) {
            log::warn!("nanoflo-serial: write failed: {e}");
        }
    }
}

fn baud_constant(rate: BaudRate) -> termios::os::target::speed_t {
    use termios::os::target::{B115200, B19200, B230400, B38400, B57600, B9600};

    match rate {
        BaudRate::Baud9600 => B9600,
        BaudRate::Baud19200 => B19200,
        BaudRate::Baud38400 => B38400,
        BaudRate::Baud57600 => B57600,
        BaudRate::Baud115200 => B115200,
        BaudRate::BaudOther(n) => n as termios::os::target::speed_t,
    }
}

impl Drop for Uart {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.0);
        }
    }
}

impl AsRawFd for Uart {
    fn as_raw_fd(&self) -> RawFd {
        self.0
    }
}

impl io::Read for Uart {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = unsafe { libc::read(self.0, buf.as_mut_ptr() as *mut libc::c_void, buf.len()) };
        if len >= 0 {
            Ok(len as usize)
        } else {
            Err(io::Error::last_os_error())
        }
    }
}

impl io::Write for Uart {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let len = unsafe { libc::write(self.0, buf.as_ptr() as *const libc::c_void, buf.len()) };
        if len >= 0 {
            Ok(len as usize)
        } else {
            Err(io::Error::last_os_error())
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        termios::tcdrain(self.0)
    }
}
