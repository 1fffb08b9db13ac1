use super::geojson::FeatureCollection;
use crate::types::{Coord, DatasetSide};
use serde::Serialize;

/// One feature flattened into display coordinates.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DisplayFeature {
    pub label: Option<String>,
    pub points: Vec<Coord>,
    pub paths: Vec<Vec<Coord>>,
}

impl DisplayFeature {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.paths.is_empty()
    }

    /// Label anchor: the first isolated point if any, otherwise the mean of
    /// the path vertices (closing vertices of rings counted once).
    pub fn anchor(&self) -> Option<Coord> {
        if let Some(p) = self.points.first() {
            return Some(*p);
        }
        let mut sum = [0.0, 0.0];
        let mut n = 0usize;
        for path in &self.paths {
            let open = match path.as_slice() {
                [first, .., last] if first == last => &path[..path.len() - 1],
                _ => &path[..],
            };
            for p in open {
                sum[0] += p[0];
                sum[1] += p[1];
                n += 1;
            }
        }
        (n > 0).then(|| [sum[0] / n as f64, sum[1] / n as f64])
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FeatureLabel {
    pub text: String,
    pub anchor: Coord,
}

/// Base geometry of one surface, in that surface's display projection.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BaseLayer {
    pub side: DatasetSide,
    pub features: Vec<DisplayFeature>,
}

impl BaseLayer {
    pub fn empty(side: DatasetSide) -> Self {
        Self {
            side,
            features: Vec::new(),
        }
    }

    /// Projects every feature for `side`; features without usable geometry
    /// are dropped.
    pub fn build(side: DatasetSide, collection: &FeatureCollection, key: Option<&str>) -> Self {
        let features = collection
            .features
            .iter()
            .filter_map(|feature| {
                let geom = feature.geometry.as_ref()?;
                let (points, paths) = geom.flatten_for(side);
                let out = DisplayFeature {
                    label: key.and_then(|k| feature.label(k)),
                    points,
                    paths,
                };
                (!out.is_empty()).then_some(out)
            })
            .collect();
        Self { side, features }
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.features
            .iter()
            .map(|f| f.points.len() + f.paths.iter().map(Vec::len).sum::<usize>())
            .sum()
    }

    /// `[minX, minY, maxX, maxY]` over all vertices, `None` when empty.
    pub fn extent(&self) -> Option<[f64; 4]> {
        let mut ext: Option<[f64; 4]> = None;
        let vertices = self
            .features
            .iter()
            .flat_map(|f| f.points.iter().chain(f.paths.iter().flatten()));
        for p in vertices {
            let e = ext.get_or_insert([p[0], p[1], p[0], p[1]]);
            e[0] = e[0].min(p[0]);
            e[1] = e[1].min(p[1]);
            e[2] = e[2].max(p[0]);
            e[3] = e[3].max(p[1]);
        }
        ext
    }

    pub fn labels(&self) -> Vec<FeatureLabel> {
        self.features
            .iter()
            .filter_map(|f| {
                Some(FeatureLabel {
                    text: f.label.clone()?,
                    anchor: f.anchor()?,
                })
            })
            .collect()
    }
}
