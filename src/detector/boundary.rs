use super::surface::SurfaceId;
use super::volume::VolumeId;

slotmap::new_key_type! {
    /// Unique identifier for a boundary surface in the tracking geometry.
    pub struct BoundaryId;
}

/// Which side of a boundary surface the owning volume is bounded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundarySide {
    /// The surface bounds the volume from outside; the volume lies on the
    /// inner side of the surface.
    Outer,
    /// The surface bounds the volume from inside (the inner wall of a
    /// tube); the volume lies on the outer side of the surface.
    Inner,
}

impl BoundarySide {
    /// Orientation of the boundary surface at construction `index` out of
    /// `count` surfaces decomposed from a volume's bounds.
    ///
    /// For cylinder bounds with more than three surfaces, index 3 is the
    /// inner tube wall and bounds the volume from the inner side; every
    /// other surface bounds it from the outer side.
    ///
    /// The rule looks at the position only. A solid sector cylinder has
    /// no inner tube, so its index 3 is the `-phi` plane, and that plane
    /// is flagged [`BoundarySide::Inner`] as well. The sector volume then
    /// sits on the plane's normal side: leaving through it reports the
    /// sector itself, entering through it reports no volume until a
    /// neighbour is glued.
    #[must_use]
    pub fn for_position(index: usize, count: usize, cylindrical: bool) -> Self {
        if cylindrical && count > 3 && index == 3 {
            Self::Inner
        } else {
            Self::Outer
        }
    }
}

/// A surface separating two volumes.
///
/// Both volume references are non-owning. The volume that created the
/// boundary is attached on the side given by [`BoundarySide`]; the other
/// side stays empty until a neighbouring volume is glued to it.
#[derive(Debug, Clone)]
pub struct BoundaryData {
    /// The underlying surface, stored alongside all other surfaces.
    pub surface: SurfaceId,
    /// Orientation relative to the volume that created the boundary.
    pub side: BoundarySide,
    /// Volume on the inner side (against the surface normal).
    pub inside: Option<VolumeId>,
    /// Volume on the outer side (along the surface normal).
    pub outside: Option<VolumeId>,
}

impl BoundaryData {
    /// Creates a boundary surface of `volume` with the given orientation.
    #[must_use]
    pub fn new(surface: SurfaceId, volume: VolumeId, side: BoundarySide) -> Self {
        let (inside, outside) = match side {
            BoundarySide::Outer => (Some(volume), None),
            BoundarySide::Inner => (None, Some(volume)),
        };
        Self {
            surface,
            side,
            inside,
            outside,
        }
    }
}
