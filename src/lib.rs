pub mod geom;
pub mod io;
pub mod study;
pub mod vecutils;

// Prelude
pub use geom::mesh::TriMesh;
pub use geom::point::Point;
pub use geom::polygon::Polygon;
pub use geom::triangles::TriangleIndex;
pub use geom::vector::Vector;
pub use study::aggregate::{radiation, sunlight_hours, view_factor};
pub use study::context::ContextMesh;
pub use study::directions::{SkyDome, SkyPatch, SunVectorSet, ViewFields, ViewTarget};
pub use study::engine::{TargetSet, VisibilityEngine, VisibilityResult};
pub use study::sampler::{sample_mesh, sample_polygons, SampledSurface};
pub use study::{StudyResult, TestPoint};
