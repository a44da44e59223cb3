//! CIECAM02 and CAM16 color appearance models.
//!
//! Both models share the same structure and differ only in the matrices used
//! for chromatic adaptation and for the cone response space:
//!
//! ```text
//! CIECAM02: adapt in CAT02, compress in Hunt-Pointer-Estévez
//! CAM16:    adapt and compress in M16
//! ```
//!
//! Forward and inverse transforms follow the compact formulation used by
//! Material Color Utilities, which folds the `+0.1` response offsets into the
//! achromatic and eccentricity terms.
//!
//! Both default conditions discount the illuminant (`D = 1`), so neutral
//! colors map to zero chroma and greys round-trip exactly.
//!
//! # Reference
//! CIE 159:2004 — A colour appearance model for colour management systems
//! Li et al. (2017) — Comprehensive colour appearance model (CAM16)

use std::sync::LazyLock;

use glam::{DMat3, DVec3};

use super::rgb_to_xyz100;
use crate::color::Rgb;

/// CAT02 chromatic adaptation matrix.
const M_CAT02: [[f64; 3]; 3] = [
    [0.7328, 0.4296, -0.1624],
    [-0.7036, 1.6975, 0.0061],
    [0.0030, 0.0136, 0.9834],
];

/// Hunt-Pointer-Estévez cone response matrix.
const M_HPE: [[f64; 3]; 3] = [
    [0.38971, 0.68898, -0.07868],
    [-0.22981, 1.18340, 0.04641],
    [0.0, 0.0, 1.0],
];

/// CAM16 combined adaptation and cone matrix.
const M_16: [[f64; 3]; 3] = [
    [0.401288, 0.650173, -0.051461],
    [-0.250268, 1.204414, 0.045854],
    [-0.002079, 0.048952, 0.953127],
];

/// Scaling used by the CAM02-UCS / CAM16-UCS uniform spaces.
const UCS_C1: f64 = 0.007;
const UCS_C2: f64 = 0.0228;

/// Build a matrix from row-major data.
fn rows(m: [[f64; 3]; 3]) -> DMat3 {
    DMat3::from_cols_array_2d(&m).transpose()
}

/// Which appearance model a set of viewing conditions belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppearanceModel {
    Ciecam02,
    Cam16,
}

/// Surround parameters `(F, c, Nc)`.
#[derive(Debug, Clone, Copy)]
pub struct Surround {
    pub f: f64,
    pub c: f64,
    pub nc: f64,
}

impl Surround {
    /// Average surround (typical viewing of reflective or self-luminous colors).
    pub const AVERAGE: Self = Self {
        f: 1.0,
        c: 0.69,
        nc: 1.0,
    };
}

/// Lightness, chroma and hue correlates of an appearance model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jch {
    /// Lightness `J` in `[0, 100]`.
    pub j: f64,
    /// Chroma `C`.
    pub c: f64,
    /// Hue angle in degrees, `[0, 360)`.
    pub h: f64,
}

/// Precomputed viewing-condition terms for one model.
#[derive(Debug, Clone)]
pub struct ViewingConditions {
    cat: DMat3,
    cat_inv: DMat3,
    to_cone: DMat3,
    from_cone: DMat3,
    rgb_d: DVec3,
    n: f64,
    nbb: f64,
    ncb: f64,
    c: f64,
    nc: f64,
    z: f64,
    fl: f64,
    fl_root: f64,
    aw: f64,
}

/// CIECAM02 under D65 white, `La = 64/π/5`, `Yb = 20`, average surround.
pub static CIECAM02: LazyLock<ViewingConditions> = LazyLock::new(|| {
    ViewingConditions::new(
        AppearanceModel::Ciecam02,
        white_xyz(),
        64.0 / std::f64::consts::PI / 5.0,
        20.0,
        Surround::AVERAGE,
        true,
    )
});

/// CAM16 under the default HCT conditions: D65 white, mid-grey background.
pub static CAM16: LazyLock<ViewingConditions> = LazyLock::new(|| {
    let background_y = y_from_lstar(50.0);
    ViewingConditions::new(
        AppearanceModel::Cam16,
        white_xyz(),
        200.0 / std::f64::consts::PI * background_y / 100.0,
        background_y,
        Surround::AVERAGE,
        true,
    )
});

fn white_xyz() -> DVec3 {
    rgb_to_xyz100(Rgb::new(1.0, 1.0, 1.0))
}

impl ViewingConditions {
    /// Derive the viewing-condition terms.
    ///
    /// `white` is the adopted white in XYZ with `Y = 100`,
    /// `adapting_luminance` is `La` in cd/m² and `background_y` is `Yb`.
    /// With `discounting` the degree of adaptation is forced to 1.
    pub fn new(
        model: AppearanceModel,
        white: DVec3,
        adapting_luminance: f64,
        background_y: f64,
        surround: Surround,
        discounting: bool,
    ) -> Self {
        let (cat, to_cone) = match model {
            AppearanceModel::Ciecam02 => {
                let cat = rows(M_CAT02);
                (cat, rows(M_HPE) * cat.inverse())
            }
            AppearanceModel::Cam16 => (rows(M_16), DMat3::IDENTITY),
        };

        let la = adapting_luminance;
        let d = if discounting {
            1.0
        } else {
            (surround.f * (1.0 - (1.0 / 3.6) * ((-la - 42.0) / 92.0).exp())).clamp(0.0, 1.0)
        };

        let rgb_w = cat * white;
        let rgb_d = DVec3::splat(d) * DVec3::splat(white.y) / rgb_w + DVec3::splat(1.0 - d);

        let k = 1.0 / (5.0 * la + 1.0);
        let k4 = k.powi(4);
        let fl = 0.2 * k4 * (5.0 * la) + 0.1 * (1.0 - k4).powi(2) * (5.0 * la).cbrt();

        let n = background_y / white.y;
        let z = 1.48 + n.sqrt();
        let nbb = 0.725 / n.powf(0.2);

        let cone_w = compress(to_cone * (rgb_w * rgb_d), fl);
        let aw = (2.0 * cone_w.x + cone_w.y + 0.05 * cone_w.z) * nbb;

        Self {
            cat,
            cat_inv: cat.inverse(),
            to_cone,
            from_cone: to_cone.inverse(),
            rgb_d,
            n,
            nbb,
            ncb: nbb,
            c: surround.c,
            nc: surround.nc,
            z,
            fl,
            fl_root: fl.powf(0.25),
            aw,
        }
    }

    /// Compute J, C and h for an XYZ color (`Y = 100` for white).
    pub fn jch_from_xyz(&self, xyz: DVec3) -> Jch {
        let adapted = (self.cat * xyz) * self.rgb_d;
        let cone = compress(self.to_cone * adapted, self.fl);

        let a = (11.0 * cone.x - 12.0 * cone.y + cone.z) / 11.0;
        let b = (cone.x + cone.y - 2.0 * cone.z) / 9.0;
        let u = (20.0 * cone.x + 20.0 * cone.y + 21.0 * cone.z) / 20.0;
        let p2 = (40.0 * cone.x + 20.0 * cone.y + cone.z) / 20.0;

        let h = b.atan2(a).to_degrees().rem_euclid(360.0);

        let achromatic = p2 * self.nbb;
        let j = 100.0 * (achromatic / self.aw).max(0.0).powf(self.c * self.z);

        let e_hue = 0.25 * ((h.to_radians() + 2.0).cos() + 3.8);
        let p1 = 50000.0 / 13.0 * e_hue * self.nc * self.ncb;
        let t = p1 * a.hypot(b) / (u + 0.305);
        let alpha = t.max(0.0).powf(0.9) * (1.64 - 0.29_f64.powf(self.n)).powf(0.73);
        let c = alpha * (j / 100.0).sqrt();

        Jch { j, c, h }
    }

    /// Inverse of [`jch_from_xyz`](Self::jch_from_xyz).
    pub fn xyz_from_jch(&self, jch: Jch) -> DVec3 {
        let Jch { j, c, h } = jch;
        if j <= 0.0 {
            return DVec3::ZERO;
        }

        let alpha = if c == 0.0 { 0.0 } else { c / (j / 100.0).sqrt() };
        let t = (alpha / (1.64 - 0.29_f64.powf(self.n)).powf(0.73)).powf(1.0 / 0.9);

        let h_rad = h.to_radians();
        let e_hue = 0.25 * ((h_rad + 2.0).cos() + 3.8);
        let ac = self.aw * (j / 100.0).powf(1.0 / self.c / self.z);
        let p1 = e_hue * (50000.0 / 13.0) * self.nc * self.ncb;
        let p2 = ac / self.nbb;

        let (h_sin, h_cos) = h_rad.sin_cos();
        let gamma = 23.0 * (p2 + 0.305) * t / (23.0 * p1 + 11.0 * t * h_cos + 108.0 * t * h_sin);
        let a = gamma * h_cos;
        let b = gamma * h_sin;

        let cone = DVec3::new(
            (460.0 * p2 + 451.0 * a + 288.0 * b) / 1403.0,
            (460.0 * p2 - 891.0 * a - 261.0 * b) / 1403.0,
            (460.0 * p2 - 220.0 * a - 6300.0 * b) / 1403.0,
        );

        let adapted = self.from_cone * decompress(cone, self.fl);
        self.cat_inv * (adapted / self.rgb_d)
    }

    /// Colorfulness `M` for a chroma value.
    pub fn colorfulness(&self, chroma: f64) -> f64 {
        chroma * self.fl_root
    }

    /// Convert JCh to the uniform `J'a'b'` space.
    pub fn ucs_from_jch(&self, jch: Jch) -> [f64; 3] {
        let j_prime = (1.0 + 100.0 * UCS_C1) * jch.j / (1.0 + UCS_C1 * jch.j);
        let m_prime = (1.0 + UCS_C2 * self.colorfulness(jch.c)).ln() / UCS_C2;
        let (sin, cos) = jch.h.to_radians().sin_cos();
        [j_prime, m_prime * cos, m_prime * sin]
    }

    /// Inverse of [`ucs_from_jch`](Self::ucs_from_jch).
    pub fn jch_from_ucs(&self, jab: [f64; 3]) -> Jch {
        let [j_prime, a, b] = jab;
        let j = j_prime / (1.0 + 100.0 * UCS_C1 - UCS_C1 * j_prime);
        let m_prime = a.hypot(b);
        let m = ((UCS_C2 * m_prime).exp() - 1.0) / UCS_C2;
        Jch {
            j,
            c: m / self.fl_root,
            h: b.atan2(a).to_degrees().rem_euclid(360.0),
        }
    }
}

/// Post-adaptation non-linear response compression.
fn compress(cone: DVec3, fl: f64) -> DVec3 {
    let f = |x: f64| {
        let af = (fl * x.abs() / 100.0).powf(0.42);
        x.signum() * 400.0 * af / (af + 27.13)
    };
    DVec3::new(f(cone.x), f(cone.y), f(cone.z))
}

/// Inverse of [`compress`].
fn decompress(response: DVec3, fl: f64) -> DVec3 {
    let f = |x: f64| {
        let base = (27.13 * x.abs() / (400.0 - x.abs())).max(0.0);
        x.signum() * (100.0 / fl) * base.powf(1.0 / 0.42)
    };
    DVec3::new(f(response.x), f(response.y), f(response.z))
}

/// CIE L* from relative luminance `Y` in `[0, 100]`.
pub fn lstar_from_y(y: f64) -> f64 {
    let y = y / 100.0;
    let f = if y > 216.0 / 24389.0 {
        y.cbrt()
    } else {
        (24389.0 / 27.0 * y + 16.0) / 116.0
    };
    116.0 * f - 16.0
}

/// Relative luminance `Y` in `[0, 100]` from CIE L*.
pub fn y_from_lstar(lstar: f64) -> f64 {
    let ft = (lstar + 16.0) / 116.0;
    let ft3 = ft * ft * ft;
    let y = if ft3 > 216.0 / 24389.0 {
        ft3
    } else {
        (116.0 * ft - 16.0) / (24389.0 / 27.0)
    };
    y * 100.0
}
