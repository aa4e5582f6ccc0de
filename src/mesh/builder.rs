//! Mesh construction utilities.
//!
//! This module converts between face-vertex lists (the form a caller
//! supplies a base mesh in, and reads results back out as) and the paired
//! half-edge representation.

use std::collections::HashMap;

use nalgebra::Point3;

use super::halfedge::{Face, HalfEdgeMesh};
use super::index::{FaceId, HalfEdgeId, VertexId};
use crate::error::{GrowthError, Result};

/// Build a half-edge mesh from vertices and triangle faces.
///
/// Half-edges are emitted in opposite-pairs at consecutive positions, so
/// every even index is a representative of one undirected edge.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of triangle faces, each as [v0, v1, v2] indices
///
/// # Returns
/// A half-edge mesh, or an error if the input is empty, references invalid
/// vertices, contains degenerate faces, or is non-manifold.
///
/// # Example
/// ```
/// use burgeon::mesh::build_from_triangles;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_faces(), 1);
/// ```
pub fn build_from_triangles(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<HalfEdgeMesh> {
    if vertices.is_empty() || faces.is_empty() {
        return Err(GrowthError::EmptyMesh);
    }

    for (fi, face) in faces.iter().enumerate() {
        for &vi in face {
            if vi >= vertices.len() {
                return Err(GrowthError::InvalidVertexIndex { face: fi, vertex: vi });
            }
        }
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            return Err(GrowthError::DegenerateFace { face: fi });
        }
    }

    let mut mesh = HalfEdgeMesh::with_capacity(vertices.len(), faces.len());
    for &pos in vertices {
        mesh.add_vertex(pos);
    }

    // Map from undirected edge (lo, hi) to the even half-edge of its pair,
    // which always runs lo -> hi.
    let mut edge_map: HashMap<(usize, usize), HalfEdgeId> = HashMap::new();

    for face in faces {
        let face_id = FaceId::new(mesh.num_faces());
        mesh.faces.push(Face::new(HalfEdgeId::invalid()));

        let mut hes = [HalfEdgeId::invalid(); 3];
        for k in 0..3 {
            let va = face[k];
            let vb = face[(k + 1) % 3];
            let key = (va.min(vb), va.max(vb));

            let base = match edge_map.get(&key) {
                Some(&base) => base,
                None => {
                    let base = mesh.add_pair(
                        VertexId::new(key.0),
                        VertexId::new(key.1),
                        FaceId::invalid(),
                        FaceId::invalid(),
                    );
                    edge_map.insert(key, base);
                    base
                }
            };

            let he = if va == key.0 { base } else { base.pair() };
            if mesh.face_of(he).is_valid() {
                // A second face traverses this directed edge.
                return Err(GrowthError::NonManifoldEdge { v0: va, v1: vb });
            }
            mesh.halfedge_mut(he).face = face_id;
            mesh.vertex_mut(VertexId::new(va)).halfedge = he;
            hes[k] = he;
        }

        mesh.link(hes[0], hes[1]);
        mesh.link(hes[1], hes[2]);
        mesh.link(hes[2], hes[0]);
        mesh.faces[face_id.index()].halfedge = hes[0];
    }

    link_boundary_loops(&mut mesh)?;

    // Boundary vertices point at a boundary half-edge so the vertex
    // circulator sweeps the full fan.
    for he in mesh.halfedge_ids().collect::<Vec<_>>() {
        if mesh.is_boundary_halfedge(he) {
            let v = mesh.start(he);
            mesh.vertex_mut(v).halfedge = he;
        }
    }

    Ok(mesh)
}

/// Link boundary half-edges into loops via their `next`/`prev` pointers.
///
/// Fails if some vertex has more than one outgoing boundary half-edge: two
/// surface fans meeting at a single vertex (a "bowtie") cannot be linked
/// into well-formed boundary loops.
fn link_boundary_loops(mesh: &mut HalfEdgeMesh) -> Result<()> {
    let boundary: Vec<HalfEdgeId> = mesh
        .halfedge_ids()
        .filter(|&he| mesh.is_boundary_halfedge(he))
        .collect();

    let mut outgoing: HashMap<usize, HalfEdgeId> = HashMap::new();
    for &he in &boundary {
        let v = mesh.start(he).index();
        if outgoing.insert(v, he).is_some() {
            return Err(GrowthError::NonManifoldVertex { vertex: v });
        }
    }

    for &he in &boundary {
        let dest = mesh.dest(he).index();
        if let Some(&next) = outgoing.get(&dest) {
            mesh.link(he, next);
        }
    }

    Ok(())
}

/// Convert a half-edge mesh back to a face-vertex representation.
///
/// Returns a (vertices, faces) tuple. Faces must be triangular, which every
/// mesh produced by [`build_from_triangles`] and edge subdivision is.
pub fn to_face_vertex(mesh: &HalfEdgeMesh) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let vertices: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

    let faces: Vec<[usize; 3]> = mesh
        .face_ids()
        .map(|f| {
            let [v0, v1, v2] = mesh.face_triangle(f);
            [v0.index(), v1.index(), v2.index()]
        })
        .collect();

    (vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_triangle() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2]];
        (vertices, faces)
    }

    fn two_triangles() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        // Two triangles sharing the edge 0-1
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [1, 0, 3]];
        (vertices, faces)
    }

    #[test]
    fn test_single_triangle() {
        let (vertices, faces) = single_triangle();
        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 3);
        assert_eq!(mesh.num_faces(), 1);
        // 3 interior half-edges + 3 boundary half-edges
        assert_eq!(mesh.num_halfedges(), 6);
        assert!(mesh.is_valid());

        for v in mesh.vertex_ids() {
            assert!(mesh.is_boundary_vertex(v));
        }
    }

    #[test]
    fn test_two_triangles() {
        let (vertices, faces) = two_triangles();
        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 2);
        // 6 interior half-edges + 4 boundary half-edges
        assert_eq!(mesh.num_halfedges(), 10);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_pairs_are_opposite() {
        let (vertices, faces) = two_triangles();
        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        for he in mesh.edge_ids() {
            assert_eq!(mesh.start(he), mesh.dest(he.pair()));
            assert_eq!(mesh.dest(he), mesh.start(he.pair()));
        }
    }

    #[test]
    fn test_closed_tetrahedron() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 4);
        // Closed mesh: 6 edges, 12 half-edges, no boundary
        assert_eq!(mesh.num_halfedges(), 12);
        assert!(mesh.is_valid());
        for v in mesh.vertex_ids() {
            assert!(!mesh.is_boundary_vertex(v));
        }
    }

    #[test]
    fn test_roundtrip() {
        let (vertices, faces) = two_triangles();
        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        let (out_verts, out_faces) = to_face_vertex(&mesh);

        assert_eq!(vertices.len(), out_verts.len());
        assert_eq!(faces.len(), out_faces.len());

        for (v_in, v_out) in vertices.iter().zip(out_verts.iter()) {
            assert!((v_in - v_out).norm() < 1e-10);
        }

        // Faces may start at a different corner but keep their vertex sets.
        for (f_in, f_out) in faces.iter().zip(out_faces.iter()) {
            let mut a = *f_in;
            let mut b = *f_out;
            a.sort_unstable();
            b.sort_unstable();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_empty_input() {
        let result = build_from_triangles(&[], &[]);
        assert!(matches!(result, Err(GrowthError::EmptyMesh)));
    }

    #[test]
    fn test_invalid_vertex_index() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0)];
        let faces = vec![[0, 1, 2]]; // Indices 1 and 2 are invalid

        let result = build_from_triangles(&vertices, &faces);
        assert!(matches!(
            result,
            Err(GrowthError::InvalidVertexIndex { .. })
        ));
    }

    #[test]
    fn test_degenerate_face() {
        let (vertices, _) = single_triangle();
        let faces = vec![[0, 0, 2]]; // Degenerate: v0 == v1

        let result = build_from_triangles(&vertices, &faces);
        assert!(matches!(result, Err(GrowthError::DegenerateFace { .. })));
    }

    #[test]
    fn test_non_manifold_edge() {
        // Three triangles all traversing edge 0-1 the same way.
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
            Point3::new(0.5, 0.0, 1.0),
        ];
        let faces = vec![[0, 1, 2], [0, 1, 3], [0, 1, 4]];

        let result = build_from_triangles(&vertices, &faces);
        assert!(matches!(result, Err(GrowthError::NonManifoldEdge { .. })));
    }

    #[test]
    fn test_non_manifold_bowtie_vertex() {
        // Two triangles touching only at vertex 0: every edge is manifold,
        // but vertex 0 has two outgoing boundary half-edges.
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(-1.0, -1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [0, 3, 4]];

        let result = build_from_triangles(&vertices, &faces);
        assert!(matches!(
            result,
            Err(GrowthError::NonManifoldVertex { vertex: 0 })
        ));
    }
}
