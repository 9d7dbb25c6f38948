use std::{fmt, str::FromStr};

use uom::si::f64::Length;

use super::UnknownMethodError;

/// Strategy used to evaluate `V(h)` or invert it to `h(V)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Method {
    /// Exact forward formula; Brent root finding for the inverse.
    #[default]
    Full,

    /// Same as [`Method::Full`].
    Brent,

    /// Piecewise-linear interpolation of a sampled table.
    TableLinear,

    /// Not-a-knot cubic spline through a sampled table.
    Spline,

    /// Chebyshev series fitted to `V(h)` and to `h(V)`.
    Chebyshev,
}

impl Method {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Brent => "brent",
            Self::TableLinear => "table_linear",
            Self::Spline => "spline",
            Self::Chebyshev => "chebyshev",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = UnknownMethodError;

    /// Parses a method name. `"brenth"` and `"linear"` are accepted as
    /// aliases of `"brent"` and `"table_linear"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(Self::Full),
            "brent" | "brenth" => Ok(Self::Brent),
            "table_linear" | "linear" => Ok(Self::TableLinear),
            "spline" => Ok(Self::Spline),
            "chebyshev" => Ok(Self::Chebyshev),
            _ => Err(UnknownMethodError {
                name: s.to_string(),
            }),
        }
    }
}

/// How a sampled table is interpolated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Interpolation {
    #[default]
    Linear,
    Spline,
}

/// Sample spacing of a volume table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TableResolution {
    /// Evenly spaced heights from empty to full, end points included.
    Points(usize),

    /// Heights `0, dx, 2·dx, …`, always ending at the full height.
    Step(Length),
}

impl Default for TableResolution {
    fn default() -> Self {
        Self::Points(100)
    }
}

/// Degrees of the forward (`V(h)`) and backward (`h(V)`) Chebyshev series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChebyshevDegrees {
    pub forward: usize,
    pub backward: usize,
}

impl Default for ChebyshevDegrees {
    fn default() -> Self {
        Self {
            forward: 50,
            backward: 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("full".parse(), Ok(Method::Full));
        assert_eq!("brenth".parse(), Ok(Method::Brent));
        assert_eq!("linear".parse(), Ok(Method::TableLinear));
        assert_eq!("table_linear".parse(), Ok(Method::TableLinear));
        assert_eq!("spline".parse(), Ok(Method::Spline));
        assert_eq!("chebyshev".parse(), Ok(Method::Chebyshev));
        assert_eq!(
            "NOTAMETHOD".parse::<Method>(),
            Err(UnknownMethodError {
                name: "NOTAMETHOD".into()
            })
        );
    }

    #[test]
    fn display_round_trips() {
        for method in [
            Method::Full,
            Method::Brent,
            Method::TableLinear,
            Method::Spline,
            Method::Chebyshev,
        ] {
            assert_eq!(method.to_string().parse(), Ok(method));
        }
    }
}
