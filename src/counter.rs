/// Clamped increment and decrement for the small counters stored per line
pub trait Saturating: Copy {
    /// Increments by one, holding at `max`
    fn sat_inc(&mut self, max: Self);

    /// Decrements by one, holding at zero
    fn sat_dec(&mut self);
}

macro_rules! impl_saturating {
    ($($t:ty),*) => {
        $(
            impl Saturating for $t {
                #[inline]
                fn sat_inc(&mut self, max: Self) {
                    if *self < max {
                        *self += 1;
                    } else {
                        *self = max;
                    }
                }

                #[inline]
                fn sat_dec(&mut self) {
                    *self = self.saturating_sub(1);
                }
            }
        )*
    };
}

impl_saturating!(u8, u16, u32);

/// The largest value representable in `bits` bits, for widths up to 16
pub const fn max_for_bits(bits: u8) -> u16 {
    ((1u32 << bits) - 1) as u16
}

/// A saturating counter which carries its own upper bound, used for PSEL and stream confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SatCounter {
    value: u16,
    max: u16,
}

impl SatCounter {
    /// Creates a counter in `[0, max]`. The initial value is clamped into range
    pub fn new(initial: u16, max: u16) -> Self {
        Self {
            value: initial.min(max),
            max,
        }
    }

    pub fn value(&self) -> u16 {
        self.value
    }

    pub fn max(&self) -> u16 {
        self.max
    }

    /// The first value of the upper half of the range, e.g. 512 for a 10 bit counter
    pub fn midpoint(&self) -> u16 {
        ((self.max as u32 + 1) / 2) as u16
    }

    #[inline]
    pub fn increment(&mut self) {
        self.value.sat_inc(self.max);
    }

    #[inline]
    pub fn decrement(&mut self) {
        self.value.sat_dec();
    }

    pub fn reset(&mut self, value: u16) {
        self.value = value.min(self.max);
    }
}
