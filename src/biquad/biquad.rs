/// `sin` and `cos` of a cutoff's angular frequency.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Omega {
    pub sin: f64,
    pub cos: f64,
}

impl Omega {
    pub fn new(sin: f64, cos: f64) -> Self {
        Self { sin, cos }
    }

    pub fn from_radians(omega: f64) -> Self {
        Self {
            sin: omega.sin(),
            cos: omega.cos(),
        }
    }

    /// Largest alpha that keeps the pole pair complex and strictly inside the unit circle.
    ///
    /// Poles stay complex while (1 - alpha)(1 + alpha) > cos², i.e. alpha < sqrt(1 - cos²).
    #[inline]
    pub fn max_complex_alpha(&self) -> f64 {
        (1.0 - self.cos * self.cos).sqrt() - 0.0001
    }
}

/// A second-order section before it is stabilized for interpolation.
///
/// `a0inv` is kept separate so the transforms can normalize everything at once. `gain` is
/// not applied to the numerator; it travels in the last coefficient slot and drives the
/// nonlinear stage of the per-sample filter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiquadDescriptor {
    pub a0inv: f64,
    pub a1: f64,
    pub a2: f64,
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub gain: f64,
}

impl BiquadDescriptor {
    /// Denominator shared by every cookbook shape.
    #[inline]
    fn with_poles(omega: Omega, alpha: f64, b0: f64, b1: f64, b2: f64) -> Self {
        Self {
            a0inv: 1.0 / (1.0 + alpha),
            a1: -2.0 * omega.cos,
            a2: 1.0 - alpha,
            b0,
            b1,
            b2,
            gain: 0.0,
        }
    }

    pub fn lowpass(omega: Omega, alpha: f64) -> Self {
        let c = omega.cos;
        Self::with_poles(omega, alpha, (1.0 - c) * 0.5, 1.0 - c, (1.0 - c) * 0.5)
    }

    pub fn highpass(omega: Omega, alpha: f64) -> Self {
        let c = omega.cos;
        Self::with_poles(omega, alpha, (1.0 + c) * 0.5, -(1.0 + c), (1.0 + c) * 0.5)
    }

    /// Constant skirt gain bandpass; peak gain equals `q`.
    pub fn bandpass(omega: Omega, alpha: f64, q: f64) -> Self {
        Self::bandpass_with_numerator(omega, alpha, q * alpha)
    }

    /// Bandpass with `b0 = -b2 = numerator`, for callers that already hold `q * alpha`.
    pub fn bandpass_with_numerator(omega: Omega, alpha: f64, numerator: f64) -> Self {
        Self::with_poles(omega, alpha, numerator, 0.0, -numerator)
    }

    pub fn notch(omega: Omega, alpha: f64) -> Self {
        Self::with_poles(omega, alpha, 1.0, -2.0 * omega.cos, 1.0)
    }

    pub fn allpass(omega: Omega, alpha: f64) -> Self {
        Self::with_poles(omega, alpha, 1.0 - alpha, -2.0 * omega.cos, 1.0 + alpha)
    }

    /// Scales the numerator, leaving the poles untouched.
    pub fn with_passband_gain(mut self, gain: f64) -> Self {
        self.b0 *= gain;
        self.b1 *= gain;
        self.b2 *= gain;
        self
    }

    pub fn with_gain(mut self, gain: f64) -> Self {
        self.gain = gain;
        self
    }

    /// `(a1, a2, b0, b1, b2)` divided by `a0`.
    #[inline]
    pub fn normalized(&self) -> (f64, f64, f64, f64, f64) {
        let s = self.a0inv;
        (
            self.a1 * s,
            self.a2 * s,
            self.b0 * s,
            self.b1 * s,
            self.b2 * s,
        )
    }

    /// |H(e^jw)| of the normalized section.
    pub fn magnitude_at(&self, omega: f64) -> f64 {
        let (a1, a2, b0, b1, b2) = self.normalized();
        let (c1, s1) = (omega.cos(), omega.sin());
        let (c2, s2) = ((2.0 * omega).cos(), (2.0 * omega).sin());
        let num_re = b0 + b1 * c1 + b2 * c2;
        let num_im = -(b1 * s1 + b2 * s2);
        let den_re = 1.0 + a1 * c1 + a2 * c2;
        let den_im = -(a1 * s1 + a2 * s2);
        ((num_re * num_re + num_im * num_im) / (den_re * den_re + den_im * den_im)).sqrt()
    }
}
