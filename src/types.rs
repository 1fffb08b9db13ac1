use crate::color::PairColor;
use serde::{Deserialize, Serialize};

/// A 2D coordinate `[x, y]`. For geographic values this is `[lon, lat]`.
pub type Coord = [f64; 2];

/// Which dataset a surface, placement or pending slot belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetSide {
    /// Unreferenced dataset being aligned.
    Raw,
    /// Georeferenced reference dataset.
    Ref,
}

impl DatasetSide {
    pub fn as_str(self) -> &'static str {
        match self {
            DatasetSide::Raw => "raw",
            DatasetSide::Ref => "ref",
        }
    }

    pub fn other(self) -> DatasetSide {
        match self {
            DatasetSide::Raw => DatasetSide::Ref,
            DatasetSide::Ref => DatasetSide::Raw,
        }
    }
}

impl std::fmt::Display for DatasetSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identity of a control pair, assigned in creation order.
pub type PairId = u64;

/// One RAW coordinate matched to one REF coordinate.
///
/// `raw` is in the RAW dataset's native space; `ref_` is REF longitude/latitude,
/// never the display projection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlPair {
    pub id: PairId,
    pub color: PairColor,
    pub raw: Coord,
    #[serde(rename = "ref")]
    pub ref_: Coord,
}

impl ControlPair {
    /// Coordinate stored for `side`.
    #[inline]
    pub fn coord(&self, side: DatasetSide) -> Coord {
        match side {
            DatasetSide::Raw => self.raw,
            DatasetSide::Ref => self.ref_,
        }
    }

    /// Exact equality on both members; used for duplicate suppression.
    #[inline]
    pub fn matches(&self, raw: &Coord, ref_: &Coord) -> bool {
        self.raw == *raw && self.ref_ == *ref_
    }

    /// `[raw, ref]` tuple as expected by the transform service.
    #[inline]
    pub fn to_tuple(&self) -> [Coord; 2] {
        [self.raw, self.ref_]
    }
}

/// A coordinate emitted by a surface, tagged with the side it came from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Placement {
    pub side: DatasetSide,
    pub coord: Coord,
    /// True when the coordinate was pulled onto a base-geometry vertex or edge.
    pub snapped: bool,
}
