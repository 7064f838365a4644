use std::fmt;
use std::ops::{Add, AddAssign};

/// Hierarchical 64-bit identifier of a detector geometry element.
///
/// The raw value packs six fields, most significant first:
///
/// | field     | bits  |
/// |-----------|-------|
/// | volume    | 56–63 |
/// | boundary  | 48–55 |
/// | layer     | 40–47 |
/// | approach  | 32–39 |
/// | sensitive | 16–31 |
/// | channel   | 0–15  |
///
/// Ordering and equality are those of the raw integer, so identifiers
/// sort volume-major and can key ordered maps directly.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GeometryId(u64);

impl GeometryId {
    pub const VOLUME_MASK: u64 = 0xff00_0000_0000_0000;
    pub const VOLUME_SHIFT: u32 = 56;
    pub const BOUNDARY_MASK: u64 = 0x00ff_0000_0000_0000;
    pub const BOUNDARY_SHIFT: u32 = 48;
    pub const LAYER_MASK: u64 = 0x0000_ff00_0000_0000;
    pub const LAYER_SHIFT: u32 = 40;
    pub const APPROACH_MASK: u64 = 0x0000_00ff_0000_0000;
    pub const APPROACH_SHIFT: u32 = 32;
    pub const SENSITIVE_MASK: u64 = 0x0000_0000_ffff_0000;
    pub const SENSITIVE_SHIFT: u32 = 16;
    pub const CHANNEL_MASK: u64 = 0x0000_0000_0000_ffff;
    pub const CHANNEL_SHIFT: u32 = 0;

    /// All `(mask, shift)` pairs, most significant field first.
    pub const FIELDS: [(u64, u32); 6] = [
        (Self::VOLUME_MASK, Self::VOLUME_SHIFT),
        (Self::BOUNDARY_MASK, Self::BOUNDARY_SHIFT),
        (Self::LAYER_MASK, Self::LAYER_SHIFT),
        (Self::APPROACH_MASK, Self::APPROACH_SHIFT),
        (Self::SENSITIVE_MASK, Self::SENSITIVE_SHIFT),
        (Self::CHANNEL_MASK, Self::CHANNEL_SHIFT),
    ];

    /// Creates an identifier from its raw value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw 64-bit value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Extracts the field selected by `mask`, shifted down by `shift`.
    ///
    /// A zero mask returns the full raw value.
    #[must_use]
    pub const fn value(self, mask: u64, shift: u32) -> u64 {
        if mask == 0 {
            self.0
        } else {
            (self.0 & mask) >> shift
        }
    }

    /// Returns a copy with the field selected by `mask` replaced by `field`.
    ///
    /// Bits of `field` that do not fit the mask are discarded.
    #[must_use]
    pub const fn with_value(self, mask: u64, shift: u32, field: u64) -> Self {
        Self((self.0 & !mask) | ((field << shift) & mask))
    }

    #[must_use]
    pub const fn volume(self) -> u64 {
        self.value(Self::VOLUME_MASK, Self::VOLUME_SHIFT)
    }

    #[must_use]
    pub const fn boundary(self) -> u64 {
        self.value(Self::BOUNDARY_MASK, Self::BOUNDARY_SHIFT)
    }

    #[must_use]
    pub const fn layer(self) -> u64 {
        self.value(Self::LAYER_MASK, Self::LAYER_SHIFT)
    }

    #[must_use]
    pub const fn approach(self) -> u64 {
        self.value(Self::APPROACH_MASK, Self::APPROACH_SHIFT)
    }

    #[must_use]
    pub const fn sensitive(self) -> u64 {
        self.value(Self::SENSITIVE_MASK, Self::SENSITIVE_SHIFT)
    }

    #[must_use]
    pub const fn channel(self) -> u64 {
        self.value(Self::CHANNEL_MASK, Self::CHANNEL_SHIFT)
    }

    #[must_use]
    pub const fn with_volume(self, volume: u64) -> Self {
        self.with_value(Self::VOLUME_MASK, Self::VOLUME_SHIFT, volume)
    }

    #[must_use]
    pub const fn with_boundary(self, boundary: u64) -> Self {
        self.with_value(Self::BOUNDARY_MASK, Self::BOUNDARY_SHIFT, boundary)
    }

    #[must_use]
    pub const fn with_layer(self, layer: u64) -> Self {
        self.with_value(Self::LAYER_MASK, Self::LAYER_SHIFT, layer)
    }

    #[must_use]
    pub const fn with_approach(self, approach: u64) -> Self {
        self.with_value(Self::APPROACH_MASK, Self::APPROACH_SHIFT, approach)
    }

    #[must_use]
    pub const fn with_sensitive(self, sensitive: u64) -> Self {
        self.with_value(Self::SENSITIVE_MASK, Self::SENSITIVE_SHIFT, sensitive)
    }

    #[must_use]
    pub const fn with_channel(self, channel: u64) -> Self {
        self.with_value(Self::CHANNEL_MASK, Self::CHANNEL_SHIFT, channel)
    }
}

impl From<u64> for GeometryId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<GeometryId> for u64 {
    fn from(id: GeometryId) -> Self {
        id.0
    }
}

// Composition of a parent identifier with a child's local offset.
impl Add for GeometryId {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl Add<u64> for GeometryId {
    type Output = Self;

    fn add(self, rhs: u64) -> Self {
        Self(self.0.wrapping_add(rhs))
    }
}

impl AddAssign for GeometryId {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.wrapping_add(rhs.0);
    }
}

impl AddAssign<u64> for GeometryId {
    fn add_assign(&mut self, rhs: u64) {
        self.0 = self.0.wrapping_add(rhs);
    }
}

impl fmt::Debug for GeometryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeometryId")
            .field("volume", &self.volume())
            .field("boundary", &self.boundary())
            .field("layer", &self.layer())
            .field("approach", &self.approach())
            .field("sensitive", &self.sensitive())
            .field("channel", &self.channel())
            .finish()
    }
}

impl fmt::Display for GeometryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "vol={} | bnd={} | lay={} | apr={} | sen={} | ch={}",
            self.volume(),
            self.boundary(),
            self.layer(),
            self.approach(),
            self.sensitive(),
            self.channel()
        )
    }
}
