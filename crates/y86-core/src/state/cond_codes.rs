/// Arithmetic condition codes.
///
/// The reset state has `ZF` set: the last "result" of a freshly powered
/// machine is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CondCodes {
    /// Zero flag.
    pub zf: bool,
    /// Sign flag.
    pub sf: bool,
    /// Signed-overflow flag.
    pub of: bool,
}

impl Default for CondCodes {
    fn default() -> Self {
        Self {
            zf: true,
            sf: false,
            of: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CondCodes;

    #[test]
    fn reset_state_has_only_zf_set() {
        let cc = CondCodes::default();
        assert!(cc.zf);
        assert!(!cc.sf);
        assert!(!cc.of);
    }
}
