use crate::Float;

/// A fixed number of colour channels. The tracer only ever uses three (linear RGB), but
/// nothing in the arithmetic depends on that.
#[derive(Clone, Copy)]
pub struct CoefficientSpectrum<const N: usize>([Float; N]);

pub type Spectrum = CoefficientSpectrum<3>;

impl<const N: usize> CoefficientSpectrum<N> {
    #[inline]
    pub fn new_with<F: FnMut(usize) -> Float>(init: F) -> Self {
        Self(std::array::from_fn(init))
    }

    #[inline]
    pub fn zip<F: Fn(Float, Float) -> Float>(&self, other: &Self, f: F) -> Self {
        Self::new_with(|i| f(self[i], other[i]))
    }

    pub fn uniform(val: Float) -> Self {
        Self([val; N])
    }

    pub fn black() -> Self {
        Self::uniform(0.0)
    }

    pub fn map<F: Fn(Float) -> Float>(&self, f: F) -> Self {
        Self::new_with(|i| f(self[i]))
    }

    pub fn is_black(&self) -> bool {
        self.0.iter().all(|&x| x == 0.0)
    }

    pub fn has_nans(&self) -> bool {
        self.0.iter().any(|&x| x.is_nan())
    }

    pub fn clamp(self, low: Float, high: Float) -> Self {
        self.map(|x| x.clamp(low, high))
    }

    pub fn powf(self, e: Float) -> Self {
        self.map(|x| x.powf(e))
    }
}

impl CoefficientSpectrum<3> {
    pub fn new(r: Float, g: Float, b: Float) -> Self {
        Self([r, g, b])
    }

    pub fn to_rgb(self) -> [Float; 3] {
        self.0
    }
}

/// Quantize a display-ready spectrum (channels already in `[0, 1]`) to 8 bits per channel.
pub fn spectrum_into_rgb8(s: Spectrum) -> [u8; 3] {
    let q = |v: Float| Float::round(v.clamp(0.0, 1.0) * 255.0) as u8;
    [q(s[0]), q(s[1]), q(s[2])]
}

impl<const N: usize> std::ops::Index<usize> for CoefficientSpectrum<N> {
    type Output = Float;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<const N: usize> std::ops::IndexMut<usize> for CoefficientSpectrum<N> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl<const N: usize> PartialEq for CoefficientSpectrum<N> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<const N: usize> Default for CoefficientSpectrum<N> {
    fn default() -> Self {
        Self::black()
    }
}

impl<const N: usize> std::fmt::Debug for CoefficientSpectrum<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl<const N: usize> From<[Float; N]> for CoefficientSpectrum<N> {
    fn from(a: [Float; N]) -> Self {
        Self(a)
    }
}

impl<const N: usize> From<CoefficientSpectrum<N>> for [Float; N] {
    fn from(s: CoefficientSpectrum<N>) -> Self {
        s.0
    }
}

impl<const N: usize> std::iter::Sum for CoefficientSpectrum<N> {
    fn sum<I: Iterator<Item=Self>>(iter: I) -> Self {
        iter.fold(Self::black(), std::ops::Add::add)
    }
}

macro_rules! impl_op {
    ($op:ident, $name:ident, $sym:tt) => {
        impl<const N: usize> std::ops::$op for CoefficientSpectrum<N> {
            type Output = Self;

            fn $name(self, rhs: Self) -> Self::Output {
                self.zip(&rhs, |x, y| x $sym y)
            }
        }

        impl<const N: usize> std::ops::$op<Float> for CoefficientSpectrum<N> {
            type Output = Self;

            fn $name(self, rhs: Float) -> Self::Output {
                self.map(|x| x $sym rhs)
            }
        }

        impl<const N: usize> std::ops::$op<CoefficientSpectrum<N>> for Float {
            type Output = CoefficientSpectrum<N>;

            fn $name(self, rhs: CoefficientSpectrum<N>) -> Self::Output {
                rhs.map(|x| self $sym x)
            }
        }
    }
}

macro_rules! impl_assign_op {
    ($op:ident, $name:ident, $sym:tt) => {
        impl<const N: usize> std::ops::$op for CoefficientSpectrum<N> {
            fn $name(&mut self, rhs: Self) {
                for i in 0..N {
                    self[i] $sym rhs[i];
                }
            }
        }

        impl<const N: usize> std::ops::$op<Float> for CoefficientSpectrum<N> {
            fn $name(&mut self, rhs: Float) {
                for i in 0..N {
                    self[i] $sym rhs;
                }
            }
        }
    }
}

impl_op!(Add, add, +);
impl_op!(Sub, sub, -);
impl_op!(Mul, mul, *);
impl_assign_op!(AddAssign, add_assign, +=);
impl_assign_op!(MulAssign, mul_assign, *=);
