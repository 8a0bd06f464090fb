pub trait FloatExt: Sized {
    /// `self == other`
    fn eq(self, other: Self) -> bool;

    /// `self` rounded to one decimal place.
    fn round_decimal(self) -> Self;
}

impl FloatExt for f64 {
    fn eq(self, other: Self) -> bool {
        (self - other).abs() < f64::EPSILON
    }

    fn round_decimal(self) -> Self {
        (self * 10.0).round() / 10.0
    }
}
