//! Quad geometry: the one mesh this demo draws.
//!
//! Four 2D positions in normalized device space and six indices describing
//! two triangles sharing the (0, 2) diagonal. Both triangles wind
//! counter-clockwise so the globally enabled back-face cull keeps them.
//! All GPU storage is allocated and uploaded once, before the frame loop,
//! and the bindings never change afterwards.

use glam::Vec2;
use glow::HasContext;

/// Quad corners: bottom-left, top-left, top-right, bottom-right.
pub const QUAD_VERTICES: [Vec2; 4] = [
    Vec2::new(-0.2, -0.2),
    Vec2::new(-0.2, 0.2),
    Vec2::new(0.2, 0.2),
    Vec2::new(0.2, -0.2),
];

/// Two CCW triangles sharing the 0-2 diagonal.
pub const QUAD_INDICES: [u32; 6] = [0, 2, 1, 2, 0, 3];

/// The quad's vertex array and its two immutable buffers.
///
/// [`Quad::new`] uploads the fixed data and leaves the vertex array, vertex
/// buffer, and index buffer bound; nothing ever resizes or rewrites them.
pub struct Quad {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ibo: glow::Buffer,
}

impl Quad {
    /// Allocate GPU storage, upload the fixed quad data, and bind it.
    ///
    /// # Panics
    ///
    /// Panics if the driver refuses to allocate a vertex array or buffer,
    /// which indicates a broken host environment.
    pub fn new(gl: &glow::Context) -> Self {
        unsafe {
            let vao = gl
                .create_vertex_array()
                .expect("failed to create vertex array");
            gl.bind_vertex_array(Some(vao));

            let vbo = gl.create_buffer().expect("failed to create vertex buffer");
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&QUAD_VERTICES),
                glow::STATIC_DRAW,
            );

            // One attribute: a tightly packed vec2 position at location 0.
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, size_of::<Vec2>() as i32, 0);

            let ibo = gl.create_buffer().expect("failed to create index buffer");
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(&QUAD_INDICES),
                glow::STATIC_DRAW,
            );

            Self { vao, vbo, ibo }
        }
    }

    /// Re-assert the static bindings.
    ///
    /// The overlay painter leaves its own vertex array bound after painting,
    /// so the draw step calls this at the top of each frame. The handles are
    /// the same ones bound at setup.
    pub fn bind(&self, gl: &glow::Context) {
        unsafe {
            gl.bind_vertex_array(Some(self.vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(self.ibo));
        }
    }

    /// Issue the indexed draw call for the quad.
    pub fn draw(&self, gl: &glow::Context) {
        unsafe {
            gl.draw_elements(
                glow::TRIANGLES,
                QUAD_INDICES.len() as i32,
                glow::UNSIGNED_INT,
                0,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Twice the signed area of triangle (a, b, c); positive means CCW.
    fn doubled_signed_area(a: Vec2, b: Vec2, c: Vec2) -> f32 {
        (b - a).perp_dot(c - a)
    }

    fn triangle(n: usize) -> (Vec2, Vec2, Vec2) {
        let i = &QUAD_INDICES[n * 3..n * 3 + 3];
        (
            QUAD_VERTICES[i[0] as usize],
            QUAD_VERTICES[i[1] as usize],
            QUAD_VERTICES[i[2] as usize],
        )
    }

    #[test]
    fn both_triangles_wind_counter_clockwise() {
        for n in 0..2 {
            let (a, b, c) = triangle(n);
            assert!(
                doubled_signed_area(a, b, c) > 0.0,
                "triangle {n} would be culled"
            );
        }
    }

    #[test]
    fn triangles_cover_the_full_square() {
        // Each triangle is half the 0.4 x 0.4 square.
        let (a, b, c) = triangle(0);
        let (d, e, f) = triangle(1);
        let area = 0.5 * (doubled_signed_area(a, b, c) + doubled_signed_area(d, e, f));
        assert!((area - 0.16).abs() < 1e-6);
    }

    #[test]
    fn triangles_share_the_diagonal() {
        let first = &QUAD_INDICES[..3];
        let second = &QUAD_INDICES[3..];
        let shared: Vec<u32> = first
            .iter()
            .copied()
            .filter(|i| second.contains(i))
            .collect();
        assert_eq!(shared.len(), 2);
        assert!(shared.contains(&0) && shared.contains(&2));
    }

    #[test]
    fn every_corner_is_referenced() {
        for corner in 0..4u32 {
            assert!(QUAD_INDICES.contains(&corner));
        }
    }

    #[test]
    fn vertices_form_an_axis_aligned_square() {
        let [bl, tl, tr, br] = QUAD_VERTICES;
        assert_eq!(bl.x, tl.x);
        assert_eq!(tr.x, br.x);
        assert_eq!(bl.y, br.y);
        assert_eq!(tl.y, tr.y);
        assert!((tr.x - bl.x - 0.4).abs() < 1e-6);
        assert!((tr.y - bl.y - 0.4).abs() < 1e-6);
    }
}
