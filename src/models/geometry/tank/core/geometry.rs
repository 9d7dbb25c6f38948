use std::f64::consts::PI;

use uom::si::{
    area::square_meter,
    f64::Length,
    length::meter,
    volume::cubic_meter,
};

use crate::support::heads::{Head, HeadError, circular_segment_area};

use super::{GeometryError, Orientation};

/// A cylindrical body closed by two heads, with everything needed to evaluate
/// `V(h)` precomputed.
///
/// Lengths are in metres and volumes in cubic metres. Side A is the left end
/// of a horizontal tank and the bottom of a vertical one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct TankGeometry {
    pub diameter: f64,
    pub length: f64,
    pub orientation: Orientation,
    pub side_a: Head,
    pub side_b: Head,

    /// Height of a full tank.
    pub h_max: f64,

    /// Volume of a full tank, exactly `V(h_max)`.
    pub v_total: f64,

    pub areas: SurfaceAreas,
}

/// Outer surface areas in square metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct SurfaceAreas {
    pub side_a: f64,
    pub side_b: f64,
    pub lateral: f64,
}

impl SurfaceAreas {
    pub fn total(&self) -> f64 {
        self.side_a + self.side_b + self.lateral
    }
}

impl TankGeometry {
    /// Assembles a tank from a resolved body and heads.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::OverlappingHeads`] if concave heads reach past
    /// each other inside the body, or an error if the full volume cannot be
    /// evaluated.
    pub fn new(
        diameter: Length,
        length: Length,
        orientation: Orientation,
        side_a: Head,
        side_b: Head,
    ) -> Result<Self, GeometryError> {
        let d = diameter.get::<meter>();
        let l = length.get::<meter>();
        let depth_a = side_a.depth().get::<meter>();
        let depth_b = side_b.depth().get::<meter>();

        let concave_depth = [(side_a, depth_a), (side_b, depth_b)]
            .into_iter()
            .filter(|(head, _)| head.is_concave())
            .map(|(_, depth)| depth)
            .sum::<f64>();
        if concave_depth > l {
            return Err(GeometryError::OverlappingHeads {
                depth: Length::new::<meter>(concave_depth),
                length,
            });
        }

        let h_max = match orientation {
            Orientation::Horizontal => d,
            Orientation::Vertical => {
                let convex = |head: &Head, depth: f64| if head.is_concave() { 0.0 } else { depth };
                convex(&side_a, depth_a) + l + convex(&side_b, depth_b)
            }
        };

        let areas = SurfaceAreas {
            side_a: side_a.surface_area().get::<square_meter>(),
            side_b: side_b.surface_area().get::<square_meter>(),
            lateral: PI * d * l,
        };

        let mut geometry = Self {
            diameter: d,
            length: l,
            orientation,
            side_a,
            side_b,
            h_max,
            v_total: 0.0,
            areas,
        };
        geometry.v_total = geometry.volume_at(h_max)?;
        Ok(geometry)
    }

    /// Liquid volume at fill height `h`, which must lie in `[0, h_max]`.
    pub fn volume_at(&self, h: f64) -> Result<f64, HeadError> {
        if h <= 0.0 {
            return Ok(0.0);
        }
        let v = match self.orientation {
            Orientation::Horizontal => self.horizontal(h)?,
            Orientation::Vertical => self.vertical(h)?,
        };
        Ok(v.max(0.0))
    }

    fn horizontal(&self, h: f64) -> Result<f64, HeadError> {
        let level = Length::new::<meter>(h.min(self.diameter));
        let body = circular_segment_area(Length::new::<meter>(self.diameter), level)
            .get::<square_meter>()
            * self.length;

        let head = |head: &Head| -> Result<f64, HeadError> {
            let v = head.horizontal_volume(level)?.get::<cubic_meter>();
            Ok(if head.is_concave() { -v } else { v })
        };
        Ok(body + head(&self.side_a)? + head(&self.side_b)?)
    }

    fn vertical(&self, h: f64) -> Result<f64, HeadError> {
        let r = 0.5 * self.diameter;
        let (bottom, top) = (&self.side_a, &self.side_b);
        let bottom_depth = bottom.depth().get::<meter>();
        let top_depth = top.depth().get::<meter>();

        let body_start = if bottom.is_concave() { 0.0 } else { bottom_depth };
        let body_end = body_start + self.length;
        let mut v = PI * r * r * (h - body_start).clamp(0.0, self.length);

        // Bottom head: apex down when convex, bulging up into the body when concave.
        if bottom.is_concave() {
            v -= full(bottom) - cap(bottom, bottom_depth - h)?;
        } else {
            v += cap(bottom, h)?;
        }

        // Top head: apex up when convex, hanging down into the body when concave.
        if top.is_concave() {
            v -= cap(top, h - (body_end - top_depth))?;
        } else if h > body_end {
            v += full(top) - cap(top, top_depth - (h - body_end))?;
        }

        Ok(v)
    }

    pub fn diameter(&self) -> Length {
        Length::new::<meter>(self.diameter)
    }

    pub fn length(&self) -> Length {
        Length::new::<meter>(self.length)
    }
}

fn full(head: &Head) -> f64 {
    head.volume().get::<cubic_meter>()
}

/// Cap volume of a head between its apex and a plane `x` above it, with `x`
/// clamped to the head depth.
fn cap(head: &Head, x: f64) -> Result<f64, HeadError> {
    let depth = head.depth().get::<meter>();
    let x = Length::new::<meter>(x.clamp(0.0, depth));
    Ok(head.vertical_volume(x)?.get::<cubic_meter>())
}
