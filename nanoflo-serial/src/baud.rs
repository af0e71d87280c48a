/// Serial port baud rates.
///
/// Mirrors the common subset of standard rates; `BaudOther` covers anything
/// not listed, with system-dependent behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaudRate {
    Baud9600,
    Baud19200,
    Baud38400,
    Baud57600,
    Baud115200,
    BaudOther(u32),
}

impl BaudRate {
    pub fn speed(&self) -> u32 {
        match *self {
            BaudRate::Baud9600 => 9600,
            BaudRate::Baud19200 => 19200,
            BaudRate::Baud38400 => 38400,
            BaudRate::Baud57600 => 57600,
            BaudRate::Baud115200 => 115200,
            BaudRate::BaudOther(n) => n,
        }
    }
}
