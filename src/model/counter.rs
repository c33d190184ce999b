use std::fmt::Debug;

/// Storage type for per-clause satisfaction counters.
///
/// A counter never exceeds the number of distinct variables in its clause, so
/// narrower types trade headroom for memory.
pub trait Counter: Copy + Default + Eq + Debug + Send + Sync + 'static {
    const ZERO: Self;
    const ONE: Self;
    /// Largest clause width this counter can track.
    const MAX_WIDTH: usize;

    fn incr(&mut self);
    fn decr(&mut self);
    fn get(self) -> usize;
}

macro_rules! impl_counter {
    ($($t:ty),*) => {
        $(
            impl Counter for $t {
                const ZERO: Self = 0;
                const ONE: Self = 1;
                const MAX_WIDTH: usize = <$t>::MAX as usize;

                #[inline(always)]
                fn incr(&mut self) {
                    debug_assert!(*self < <$t>::MAX, "counter overflow");
                    *self += 1;
                }

                #[inline(always)]
                fn decr(&mut self) {
                    debug_assert!(*self > 0, "counter underflow");
                    *self -= 1;
                }

                #[inline(always)]
                fn get(self) -> usize {
                    self as usize
                }
            }
        )*
    };
}

impl_counter!(u8, u16, u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CounterWidth {
    U8,
    U16,
    U32,
}

impl CounterWidth {
    /// Narrowest width that can count every literal of the widest clause.
    pub fn for_max_vars_in_clause(max_vars: usize) -> Self {
        if max_vars <= u8::MAX_WIDTH {
            CounterWidth::U8
        } else if max_vars <= u16::MAX_WIDTH {
            CounterWidth::U16
        } else {
            CounterWidth::U32
        }
    }

    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            8 => Some(CounterWidth::U8),
            16 => Some(CounterWidth::U16),
            32 => Some(CounterWidth::U32),
            _ => None,
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            CounterWidth::U8 => u8::BITS,
            CounterWidth::U16 => u16::BITS,
            CounterWidth::U32 => u32::BITS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_narrowest_width() {
        assert_eq!(CounterWidth::for_max_vars_in_clause(3), CounterWidth::U8);
        assert_eq!(CounterWidth::for_max_vars_in_clause(255), CounterWidth::U8);
        assert_eq!(CounterWidth::for_max_vars_in_clause(256), CounterWidth::U16);
        assert_eq!(
            CounterWidth::for_max_vars_in_clause(70_000),
            CounterWidth::U32
        );
        assert_eq!(CounterWidth::from_bits(16), Some(CounterWidth::U16));
        assert_eq!(CounterWidth::from_bits(12), None);
    }

    #[test]
    fn counter_steps() {
        let mut c = <u8 as Counter>::ZERO;
        c.incr();
        c.incr();
        c.decr();
        assert_eq!(c, <u8 as Counter>::ONE);
        assert_eq!(c.get(), 1);
    }
}
