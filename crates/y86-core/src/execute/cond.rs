//! Condition evaluator shared by `jxx` and conditional `rrmovq`.

use crate::state::CondCodes;

/// Maps a condition function nibble and the current flags to a verdict.
///
/// | ifun | meaning | predicate              |
/// |------|---------|------------------------|
/// | 0    | always  | true                   |
/// | 1    | le      | `(SF ^ OF) \|\| ZF`    |
/// | 2    | l       | `SF ^ OF`              |
/// | 3    | e       | `ZF`                   |
/// | 4    | ne      | `!ZF`                  |
/// | 5    | ge      | `!(SF ^ OF)`           |
/// | 6    | g       | `!(SF ^ OF) && !ZF`    |
///
/// Nibbles above 6 are undefined and evaluate to false, so an undefined
/// `jxx` falls through rather than faulting.
#[must_use]
pub const fn condition_holds(ifun: u8, cc: CondCodes) -> bool {
    let sf_ne_of = cc.sf != cc.of;
    match ifun {
        0x0 => true,
        0x1 => sf_ne_of || cc.zf,
        0x2 => sf_ne_of,
        0x3 => cc.zf,
        0x4 => !cc.zf,
        0x5 => !sf_ne_of,
        0x6 => !sf_ne_of && !cc.zf,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::condition_holds;
    use crate::state::CondCodes;

    const fn cc(zf: bool, sf: bool, of: bool) -> CondCodes {
        CondCodes { zf, sf, of }
    }

    #[test]
    fn always_holds_regardless_of_flags() {
        assert!(condition_holds(0, cc(false, false, false)));
        assert!(condition_holds(0, cc(true, true, true)));
    }

    #[test]
    fn signed_orderings_follow_sf_xor_of() {
        let less = cc(false, true, false);
        let greater = cc(false, false, false);
        let equal = cc(true, false, false);

        assert!(condition_holds(1, less)); // le
        assert!(condition_holds(1, equal));
        assert!(!condition_holds(1, greater));

        assert!(condition_holds(2, less)); // l
        assert!(!condition_holds(2, equal));

        assert!(condition_holds(5, greater)); // ge
        assert!(condition_holds(5, equal));
        assert!(!condition_holds(5, less));

        assert!(condition_holds(6, greater)); // g
        assert!(!condition_holds(6, equal));
        assert!(!condition_holds(6, less));
    }

    #[test]
    fn overflow_inverts_the_sign_test() {
        // SF=0 with OF=1 still means "less than".
        let wrapped_less = cc(false, false, true);
        assert!(condition_holds(2, wrapped_less));
        assert!(!condition_holds(5, wrapped_less));
    }

    #[test]
    fn equality_tests_use_zf_alone() {
        assert!(condition_holds(3, cc(true, true, true)));
        assert!(!condition_holds(3, cc(false, false, false)));
        assert!(condition_holds(4, cc(false, true, true)));
        assert!(!condition_holds(4, cc(true, false, false)));
    }

    #[test]
    fn undefined_functions_evaluate_false() {
        for ifun in 0x7_u8..=0xF {
            assert!(!condition_holds(ifun, cc(true, true, true)), "ifun {ifun:#x}");
        }
    }
}
