/// Common baud rates of serial links between hobbyist boards.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum BaudRate {
    /// 9600 baud.
    #[default]
    B9600,
    /// 19200 baud.
    B19200,
    /// 38400 baud.
    B38400,
    /// 57600 baud.
    B57600,
    /// 115200 baud.
    B115200,
}

impl From<BaudRate> for u32 {
    fn from(baud_rate: BaudRate) -> Self {
        match baud_rate {
            BaudRate::B9600 => 9_600,
            BaudRate::B19200 => 19_200,
            BaudRate::B38400 => 38_400,
            BaudRate::B57600 => 57_600,
            BaudRate::B115200 => 115_200,
        }
    }
}

#[cfg(feature = "clap")]
impl clap::ValueEnum for BaudRate {
    fn value_variants<'a>() -> &'a [Self] {
        &[
            Self::B9600,
            Self::B19200,
            Self::B38400,
            Self::B57600,
            Self::B115200,
        ]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::B9600 => clap::builder::PossibleValue::new("9600"),
            Self::B19200 => clap::builder::PossibleValue::new("19200"),
            Self::B38400 => clap::builder::PossibleValue::new("38400"),
            Self::B57600 => clap::builder::PossibleValue::new("57600"),
            Self::B115200 => clap::builder::PossibleValue::new("115200"),
        })
    }
}
