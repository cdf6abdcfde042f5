//! Tiled grid mesh: positions in the XZ plane, triangle indices and UVs.

use glam::Vec2;

/// Grid generation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridOptions {
    /// Number of tiles along X (at least 1)
    pub cols: u32,

    /// Number of tiles along Z (at least 1)
    pub rows: u32,

    /// Edge length of one square tile in world units
    pub tile_size: f32,

    /// Per-axis multiplier applied to the normalized UVs
    pub uv_scale: Vec2,
}

impl GridOptions {
    pub fn new(cols: u32, rows: u32, tile_size: f32) -> Self {
        Self {
            cols,
            rows,
            tile_size,
            uv_scale: Vec2::ONE,
        }
    }

    pub fn with_uv_scale(mut self, uv_scale: Vec2) -> Self {
        self.uv_scale = uv_scale;
        self
    }
}

/// Generated grid geometry. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// `(cols + 1) * (rows + 1)` positions, row by row along +Z
    pub vertices: Vec<[f32; 3]>,
    /// Two triangles per cell, `cols * rows * 6` indices
    pub indices: Vec<u32>,
    /// One UV pair per vertex
    pub uv: Vec<[f32; 2]>,
    /// X of the first vertex (the centering shift)
    pub x: f32,
    /// Z of the first vertex (the centering shift)
    pub y: f32,
    /// World extent along X
    pub width: f32,
    /// World extent along Z
    pub height: f32,
    pub cols: u32,
    pub rows: u32,
    pub tile_size: f32,
    /// `[cols, rows]`
    pub size: [u32; 2],
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Positions flattened to `[x, y, z, x, y, z, ...]` for buffer upload.
    pub fn vertex_data(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// UVs flattened to `[u, v, u, v, ...]` for buffer upload.
    pub fn uv_data(&self) -> &[f32] {
        bytemuck::cast_slice(&self.uv)
    }
}

/// Build a grid centered on the origin with `Y = 0` everywhere.
///
/// The last vertex of each row starts no cell, so no triangle wraps from the
/// end of one row to the start of the next.
pub fn generate_grid(options: &GridOptions) -> Mesh {
    let GridOptions {
        cols,
        rows,
        tile_size,
        uv_scale,
    } = *options;

    let width = cols + 1;
    let height = rows + 1;
    let cx = (cols as f32 * tile_size) / 2.0;
    let cy = (rows as f32 * tile_size) / 2.0;

    let vertex_count = (width * height) as usize;
    let mut vertices = Vec::with_capacity(vertex_count);
    let mut uv = Vec::with_capacity(vertex_count);

    for idx in 0..width * height {
        let y = idx / width;
        let x = idx % width;

        vertices.push([x as f32 * tile_size - cx, 0.0, y as f32 * tile_size - cy]);
        uv.push([
            (x as f32 / cols as f32) * uv_scale.x,
            (y as f32 / rows as f32) * uv_scale.y,
        ]);
    }

    let mut indices = Vec::with_capacity((cols * rows * 6) as usize);
    for idx in 0..width * height - width {
        if (idx + 1) % width != 0 {
            indices.extend_from_slice(&[idx, idx + 1, idx + width]);
            indices.extend_from_slice(&[idx + 1, idx + width + 1, idx + width]);
        }
    }

    Mesh {
        vertices,
        indices,
        uv,
        x: -cx,
        y: -cy,
        width: cols as f32 * tile_size,
        height: rows as f32 * tile_size,
        cols,
        rows,
        tile_size,
        size: [cols, rows],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_counts() {
        for (cols, rows) in [(1, 1), (3, 7), (121, 200), (101, 100)] {
            let mesh = generate_grid(&GridOptions::new(cols, rows, 0.25));
            let expected_vertices = ((cols + 1) * (rows + 1)) as usize;

            assert_eq!(mesh.vertices.len(), expected_vertices);
            assert_eq!(mesh.uv.len(), expected_vertices);
            assert_eq!(mesh.indices.len(), (cols * rows * 6) as usize);
            assert!(mesh
                .indices
                .iter()
                .all(|&i| (i as usize) < expected_vertices));
        }
    }

    #[test]
    fn test_grid_is_centered() {
        for (cols, rows, tile_size) in [(4, 2, 1.0), (121, 200, 0.25), (5, 9, 0.5)] {
            let mesh = generate_grid(&GridOptions::new(cols, rows, tile_size));
            let n = mesh.vertices.len() as f64;
            let mean_x: f64 = mesh.vertices.iter().map(|v| v[0] as f64).sum::<f64>() / n;
            let mean_z: f64 = mesh.vertices.iter().map(|v| v[2] as f64).sum::<f64>() / n;

            assert!(mean_x.abs() < 1e-4, "mean x = {}", mean_x);
            assert!(mean_z.abs() < 1e-4, "mean z = {}", mean_z);
            assert!(mesh.vertices.iter().all(|v| v[1] == 0.0));
        }
    }

    #[test]
    fn test_grid_reports_extents() {
        let mesh = generate_grid(&GridOptions::new(4, 2, 0.5));
        assert_eq!(mesh.x, -1.0);
        assert_eq!(mesh.y, -0.5);
        assert_eq!(mesh.width, 2.0);
        assert_eq!(mesh.height, 1.0);
        assert_eq!(mesh.size, [4, 2]);
        assert_eq!(mesh.vertices[0], [-1.0, 0.0, -0.5]);
        assert_eq!(*mesh.vertices.last().unwrap(), [1.0, 0.0, 0.5]);
    }

    #[test]
    fn test_triangles_stay_within_rows() {
        let mesh = generate_grid(&GridOptions::new(3, 2, 1.0));
        let width = 4;

        // First cell of the first row
        assert_eq!(&mesh.indices[..6], &[0, 1, 4, 1, 5, 4]);

        for tri in mesh.indices.chunks(3) {
            let columns: Vec<u32> = tri.iter().map(|i| i % width).collect();
            let span = columns.iter().max().unwrap() - columns.iter().min().unwrap();
            assert!(span <= 1, "triangle {:?} wraps across a row", tri);
        }
    }

    #[test]
    fn test_uv_scale() {
        let options = GridOptions::new(2, 4, 1.0).with_uv_scale(Vec2::new(2.0, 0.5));
        let mesh = generate_grid(&options);
        assert_eq!(mesh.uv[0], [0.0, 0.0]);
        assert_eq!(*mesh.uv.last().unwrap(), [2.0, 0.5]);

        let unscaled = generate_grid(&GridOptions::new(2, 4, 1.0));
        assert!(unscaled
            .uv
            .iter()
            .all(|[u, v]| (0.0..=1.0).contains(u) && (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let options = GridOptions::new(17, 9, 0.3);
        assert_eq!(generate_grid(&options), generate_grid(&options));
    }

    #[test]
    fn test_flattened_views() {
        let mesh = generate_grid(&GridOptions::new(2, 2, 1.0));
        assert_eq!(mesh.vertex_data().len(), mesh.vertex_count() * 3);
        assert_eq!(mesh.uv_data().len(), mesh.vertex_count() * 2);
        assert_eq!(&mesh.vertex_data()[..3], &mesh.vertices[0]);
    }
}
