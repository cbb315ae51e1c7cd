/// Which hardware generation the core is emulating. Affects UDI read
/// gating and the Core sub-block's NAME0 identity tag; everything else is
/// shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Current-generation TK1: UDI reads are gated by firmware mode like
    /// UDS/UDA.
    Tk1,
    /// Legacy MTA1-MKDF: UDI reads are unrestricted in any mode.
    Mta1Mkdf,
}

impl Profile {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "tk1" => Some(Profile::Tk1),
            "mta1_mkdf" => Some(Profile::Mta1Mkdf),
            _ => None,
        }
    }

    pub fn core_name0(self) -> u32 {
        match self {
            // "tk1 "
            Profile::Tk1 => 0x746b_3120,
            // "mta1"
            Profile::Mta1Mkdf => 0x6d74_6131,
        }
    }

    pub fn gates_udi_by_mode(self) -> bool {
        matches!(self, Profile::Tk1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names() {
        assert_eq!(Profile::parse("tk1"), Some(Profile::Tk1));
        assert_eq!(Profile::parse("mta1_mkdf"), Some(Profile::Mta1Mkdf));
        assert_eq!(Profile::parse("bogus"), None);
    }
}
