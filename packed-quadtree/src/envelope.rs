//! Envelopes at the query boundary and inside packed nodes.
//!
//! Queries are expressed with a double-precision [`Envelope`]. Packed nodes
//! store a [`PackedBounds`], which keeps the same rectangle in single
//! precision to halve the per-node footprint. [`BoxRounding`] decides how
//! the coordinates are narrowed.

use serde::{Deserialize, Serialize};

/// A 2D axis-aligned rectangle in double precision.
///
/// `Envelope` defines a rectangular area using the minimum (min_x, min_y)
/// and maximum (max_x, max_y) corners. It is the query type of the index
/// and the bounds type exposed by source trees.
///
/// No validation is performed: inverted or non-finite envelopes are the
/// caller's responsibility.
///
/// # Examples
///
/// ```rust
/// use packed_quadtree::Envelope;
///
/// let window = Envelope::new(0.0, 0.0, 12.0, 12.0);
/// assert!(window.intersects(&Envelope::new(5.0, 5.0, 15.0, 15.0)));
/// ```
#[derive(Clone, Copy, PartialEq, Default, Debug, Deserialize, Serialize)]
pub struct Envelope {
    /// Minimum X coordinate
    pub min_x: f64,
    /// Minimum Y coordinate
    pub min_y: f64,
    /// Maximum X coordinate
    pub max_x: f64,
    /// Maximum Y coordinate
    pub max_y: f64,
}

impl std::fmt::Display for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Envelope({}, {}, {}, {})", self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

impl Envelope {
    /// Creates a new envelope with the specified coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Envelope {
        Envelope {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Returns the width of the envelope.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Returns the height of the envelope.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Returns the center point of the envelope.
    pub fn center(&self) -> (f64, f64) {
        ((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    /// Checks if this envelope fully contains another envelope.
    pub fn contains(&self, other: &Envelope) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    /// Checks if this envelope intersects another envelope.
    ///
    /// The envelopes intersect unless one lies entirely left of, right of,
    /// above or below the other. Touching edges count as intersecting.
    pub fn intersects(&self, other: &Envelope) -> bool {
        !(other.max_x < self.min_x
            || other.min_x > self.max_x
            || other.max_y < self.min_y
            || other.min_y > self.max_y)
    }

    /// Returns the smallest envelope enclosing both envelopes.
    pub fn union(&self, other: &Envelope) -> Envelope {
        Envelope::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Splits the envelope at its center into four quadrants.
    ///
    /// Order is north-east, north-west, south-west, south-east.
    pub fn quadrants(&self) -> [Envelope; 4] {
        let (cx, cy) = self.center();
        [
            Envelope::new(cx, cy, self.max_x, self.max_y),
            Envelope::new(self.min_x, cy, cx, self.max_y),
            Envelope::new(self.min_x, self.min_y, cx, cy),
            Envelope::new(cx, self.min_y, self.max_x, cy),
        ]
    }
}

/// How double-precision coordinates are narrowed into a [`PackedBounds`].
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Deserialize, Serialize)]
pub enum BoxRounding {
    /// Round each coordinate to the nearest `f32`.
    ///
    /// A node whose true box only touches the query within one `f32` ulp
    /// can be pruned.
    #[default]
    Nearest,
    /// Round minimums down and maximums up so the stored box always
    /// encloses the source box.
    Outward,
}

/// A single-precision rectangle stored inside packed nodes.
#[derive(Clone, Copy, PartialEq, Default, Debug, Deserialize, Serialize)]
pub struct PackedBounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl PackedBounds {
    /// Narrows an envelope to single precision.
    pub fn narrow(envelope: &Envelope, rounding: BoxRounding) -> PackedBounds {
        match rounding {
            BoxRounding::Nearest => PackedBounds {
                min_x: envelope.min_x as f32,
                min_y: envelope.min_y as f32,
                max_x: envelope.max_x as f32,
                max_y: envelope.max_y as f32,
            },
            BoxRounding::Outward => PackedBounds {
                min_x: narrow_down(envelope.min_x),
                min_y: narrow_down(envelope.min_y),
                max_x: narrow_up(envelope.max_x),
                max_y: narrow_up(envelope.max_y),
            },
        }
    }

    /// Widens back to a double-precision envelope.
    pub fn widen(&self) -> Envelope {
        Envelope::new(
            f64::from(self.min_x),
            f64::from(self.min_y),
            f64::from(self.max_x),
            f64::from(self.max_y),
        )
    }

    /// Separating-axis test against a double-precision query.
    #[inline]
    pub fn intersects(&self, query: &Envelope) -> bool {
        self.widen().intersects(query)
    }
}

fn narrow_down(value: f64) -> f32 {
    let narrowed = value as f32;
    if f64::from(narrowed) > value {
        step_down(narrowed)
    } else {
        narrowed
    }
}

fn narrow_up(value: f64) -> f32 {
    let narrowed = value as f32;
    if f64::from(narrowed) < value {
        step_up(narrowed)
    } else {
        narrowed
    }
}

/// Next representable `f32` toward negative infinity.
fn step_down(value: f32) -> f32 {
    if value.is_nan() || value == f32::NEG_INFINITY {
        return value;
    }
    if value == 0.0 {
        return -f32::from_bits(1);
    }
    let bits = value.to_bits();
    if value > 0.0 {
        f32::from_bits(bits - 1)
    } else {
        f32::from_bits(bits + 1)
    }
}

/// Next representable `f32` toward positive infinity.
fn step_up(value: f32) -> f32 {
    if value.is_nan() || value == f32::INFINITY {
        return value;
    }
    if value == 0.0 {
        return f32::from_bits(1);
    }
    let bits = value.to_bits();
    if value > 0.0 {
        f32::from_bits(bits + 1)
    } else {
        f32::from_bits(bits - 1)
    }
}
