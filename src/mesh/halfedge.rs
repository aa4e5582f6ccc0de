//! Half-edge mesh data structure with paired storage.
//!
//! Each undirected edge is represented by two directed half-edges stored at
//! consecutive index positions `(2k, 2k + 1)`. The partner of a half-edge is
//! found positionally (`index ^ 1`, see [`HalfEdgeId::pair`]), so no twin
//! pointer is stored. `next`/`prev` encode face traversal and are unrelated
//! to the pairing.
//!
//! This layout lets algorithms walk one representative per undirected edge
//! by stepping through even indices `0, 2, 4, …`, and it must survive every
//! topology mutation: all operations that add half-edges append full pairs.
//!
//! # Boundary Handling
//!
//! Boundary half-edges have an invalid face ID. Their `next`/`prev` pointers
//! link boundary loops, so face traversal logic works on boundaries too.

use nalgebra::{Point3, Vector3};

use super::index::{FaceId, HalfEdgeId, VertexId};

/// A vertex in the half-edge mesh.
#[derive(Debug, Clone)]
pub struct Vertex {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// One outgoing half-edge from this vertex.
    /// For boundary vertices, this is a boundary half-edge.
    pub halfedge: HalfEdgeId,
}

impl Vertex {
    /// Create a new vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            halfedge: HalfEdgeId::invalid(),
        }
    }
}

/// A half-edge in the mesh.
///
/// The opposite half-edge is not stored; it lives at the partner index
/// (`id.pair()`).
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge {
    /// The vertex this half-edge starts from.
    pub start: VertexId,

    /// The next half-edge around the face (counter-clockwise).
    pub next: HalfEdgeId,

    /// The previous half-edge around the face.
    pub prev: HalfEdgeId,

    /// The face this half-edge belongs to. Invalid for boundary half-edges.
    pub face: FaceId,
}

impl HalfEdge {
    /// Create a new uninitialized half-edge.
    pub fn new() -> Self {
        Self {
            start: VertexId::invalid(),
            next: HalfEdgeId::invalid(),
            prev: HalfEdgeId::invalid(),
            face: FaceId::invalid(),
        }
    }

    /// Check if this half-edge is on the boundary.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.face.is_valid()
    }
}

impl Default for HalfEdge {
    fn default() -> Self {
        Self::new()
    }
}

/// A face in the half-edge mesh.
#[derive(Debug, Clone, Copy)]
pub struct Face {
    /// One half-edge on the boundary of this face.
    pub halfedge: HalfEdgeId,
}

impl Face {
    /// Create a new face with the given half-edge.
    pub fn new(halfedge: HalfEdgeId) -> Self {
        Self { halfedge }
    }
}

/// A half-edge mesh with positionally paired half-edges.
///
/// Vertices and half-edges grow by append only; subdivision never removes
/// elements, so indices handed out earlier stay stable.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) halfedges: Vec<HalfEdge>,
    pub(crate) faces: Vec<Face>,
}

impl Default for HalfEdgeMesh {
    fn default() -> Self {
        Self::new()
    }
}

impl HalfEdgeMesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            halfedges: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        // Closed triangle mesh: HE = 3F; leave headroom for boundary pairs
        let num_halfedges = num_faces * 3 + num_faces / 2;

        Self {
            vertices: Vec::with_capacity(num_vertices),
            halfedges: Vec::with_capacity(num_halfedges),
            faces: Vec::with_capacity(num_faces),
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of half-edges.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    /// Get a mutable vertex by ID.
    #[inline]
    pub fn vertex_mut(&mut self, id: VertexId) -> &mut Vertex {
        &mut self.vertices[id.index()]
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId) -> &HalfEdge {
        &self.halfedges[id.index()]
    }

    /// Get a mutable half-edge by ID.
    #[inline]
    pub fn halfedge_mut(&mut self, id: HalfEdgeId) -> &mut HalfEdge {
        &mut self.halfedges[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Set the position of a vertex.
    #[inline]
    pub fn set_position(&mut self, v: VertexId, pos: Point3<f64>) {
        self.vertex_mut(v).position = pos;
    }

    // ==================== Topology Queries ====================

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.halfedge(he).next
    }

    /// Get the previous half-edge around the face.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.halfedge(he).prev
    }

    /// Get the start vertex of a half-edge.
    #[inline]
    pub fn start(&self, he: HalfEdgeId) -> VertexId {
        self.halfedge(he).start
    }

    /// Get the destination vertex of a half-edge (the partner's start).
    #[inline]
    pub fn dest(&self, he: HalfEdgeId) -> VertexId {
        self.start(he.pair())
    }

    /// Get the face of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId) -> FaceId {
        self.halfedge(he).face
    }

    /// Check if a half-edge is on the boundary.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId) -> bool {
        self.halfedge(he).is_boundary()
    }

    /// Check if an edge (represented by either of its half-edges) is on the
    /// boundary.
    #[inline]
    pub fn is_boundary_edge(&self, he: HalfEdgeId) -> bool {
        self.is_boundary_halfedge(he) || self.is_boundary_halfedge(he.pair())
    }

    /// Check if a vertex is on the boundary.
    pub fn is_boundary_vertex(&self, v: VertexId) -> bool {
        let start = self.vertex(v).halfedge;
        if !start.is_valid() {
            return true; // Isolated vertex
        }

        let mut he = start;
        loop {
            if self.is_boundary_halfedge(he) {
                return true;
            }
            he = self.next(he.pair());
            if he == start {
                break;
            }
        }
        false
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    /// Iterate over one representative half-edge per undirected edge.
    ///
    /// Representatives are the even indices `0, 2, 4, …` — the first member
    /// of each opposite-pair.
    pub fn edge_ids(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        (0..self.halfedges.len()).step_by(2).map(HalfEdgeId::new)
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over outgoing half-edges around a vertex.
    pub fn vertex_halfedges(&self, v: VertexId) -> VertexHalfEdgeIter<'_> {
        VertexHalfEdgeIter::new(self, v)
    }

    /// Iterate over vertices adjacent to a vertex.
    pub fn vertex_neighbors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.vertex_halfedges(v).map(|he| self.dest(he))
    }

    /// Get the three vertices of a triangular face.
    pub fn face_triangle(&self, f: FaceId) -> [VertexId; 3] {
        let he0 = self.face(f).halfedge;
        let he1 = self.next(he0);
        let he2 = self.next(he1);
        [self.start(he0), self.start(he1), self.start(he2)]
    }

    /// Iterate over half-edges around a face.
    pub fn face_halfedges(&self, f: FaceId) -> FaceHalfEdgeIter<'_> {
        FaceHalfEdgeIter::new(self, f)
    }

    /// Iterate over vertices of a face.
    pub fn face_vertices(&self, f: FaceId) -> impl Iterator<Item = VertexId> + '_ {
        self.face_halfedges(f).map(|he| self.start(he))
    }

    // ==================== Geometry ====================

    /// Compute the length of an edge.
    pub fn edge_length(&self, he: HalfEdgeId) -> f64 {
        let p0 = self.position(self.start(he));
        let p1 = self.position(self.dest(he));
        (p1 - p0).norm()
    }

    /// Compute the midpoint of an edge.
    pub fn edge_midpoint(&self, he: HalfEdgeId) -> Point3<f64> {
        let p0 = self.position(self.start(he));
        let p1 = self.position(self.dest(he));
        Point3::from((p0.coords + p1.coords) * 0.5)
    }

    /// Compute the (unnormalized) normal of a triangular face.
    pub fn face_normal(&self, f: FaceId) -> Vector3<f64> {
        let [v0, v1, v2] = self.face_triangle(f);
        let p0 = self.position(v0);
        let p1 = self.position(v1);
        let p2 = self.position(v2);
        (p1 - p0).cross(&(p2 - p0))
    }

    /// Compute the valence (degree) of a vertex.
    pub fn valence(&self, v: VertexId) -> usize {
        self.vertex_halfedges(v).count()
    }

    // ==================== Construction ====================

    /// Add a new vertex and return its ID.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position));
        id
    }

    /// Append an opposite-pair of half-edges and return the first id (even).
    ///
    /// `he` becomes `start_a -> start_b` with face `face_a`; its partner
    /// becomes `start_b -> start_a` with face `face_b`. `next`/`prev` are
    /// left invalid and must be wired by the caller.
    pub(crate) fn add_pair(
        &mut self,
        start_a: VertexId,
        start_b: VertexId,
        face_a: FaceId,
        face_b: FaceId,
    ) -> HalfEdgeId {
        let id = HalfEdgeId::new(self.halfedges.len());
        self.halfedges.push(HalfEdge {
            start: start_a,
            next: HalfEdgeId::invalid(),
            prev: HalfEdgeId::invalid(),
            face: face_a,
        });
        self.halfedges.push(HalfEdge {
            start: start_b,
            next: HalfEdgeId::invalid(),
            prev: HalfEdgeId::invalid(),
            face: face_b,
        });
        id
    }

    /// Make `a` and `b` consecutive in their face loop: `next(a) = b`.
    #[inline]
    pub(crate) fn link(&mut self, a: HalfEdgeId, b: HalfEdgeId) {
        self.halfedge_mut(a).next = b;
        self.halfedge_mut(b).prev = a;
    }

    // ==================== Topology Mutations ====================

    /// Split an edge at its midpoint.
    ///
    /// Creates one new vertex at the midpoint of the edge's endpoints
    /// (computed before any pointers are rewired), splices a new
    /// opposite-pair into the half-edge cycles on both sides, and — for each
    /// side bordering a real face — splits that face back into triangles.
    ///
    /// After the call, `he` runs from its original start vertex to the new
    /// midpoint vertex. Returns the id of the new half-edge running from the
    /// midpoint to the original destination.
    ///
    /// # Panics
    ///
    /// Panics if `he` is out of range.
    pub fn split_edge(&mut self, he: HalfEdgeId) -> HalfEdgeId {
        let t = he.pair();
        let a = self.start(he);
        let b = self.start(t);
        let midpoint = self.edge_midpoint(he);
        let m = self.add_vertex(midpoint);

        let face_h = self.face_of(he);
        let face_t = self.face_of(t);

        // New pair: n runs m -> b on he's side, n.pair() runs b -> m on t's.
        let n = self.add_pair(m, b, face_h, face_t);
        let n2 = n.pair();

        let he_next = self.next(he);
        let t_prev = self.prev(t);
        self.link(he, n);
        self.link(n, he_next);
        self.link(t_prev, n2);
        self.link(n2, t);
        self.halfedge_mut(t).start = m;

        // The midpoint's outgoing half-edge prefers a boundary half-edge.
        self.vertex_mut(m).halfedge = if !face_t.is_valid() { t } else { n };
        if self.vertex(b).halfedge == t {
            self.vertex_mut(b).halfedge = n2;
        }

        // Retriangulate the quads left on each real-face side.
        if face_h.is_valid() {
            let from = self.prev(he);
            self.split_face(n, from);
        }
        if face_t.is_valid() {
            let from = self.next(self.next(t));
            self.split_face(t, from);
        }

        n
    }

    /// Split a face in two by inserting a diagonal.
    ///
    /// `to` and `from` must be half-edges of the same face. A new
    /// opposite-pair is inserted from `start(to)` to `start(from)`; the loop
    /// containing `from` keeps the old face and the loop containing `to`
    /// becomes a new face. Returns the new half-edge kept by the old face.
    pub fn split_face(&mut self, to: HalfEdgeId, from: HalfEdgeId) -> HalfEdgeId {
        let f = self.face_of(to);
        debug_assert_eq!(f, self.face_of(from), "to/from must share a face");

        let d = self.add_pair(self.start(to), self.start(from), f, FaceId::invalid());
        let d2 = d.pair();

        let prev_to = self.prev(to);
        let prev_from = self.prev(from);
        self.link(prev_to, d);
        self.link(d, from);
        self.link(prev_from, d2);
        self.link(d2, to);

        self.faces[f.index()].halfedge = d;

        let g = FaceId::new(self.faces.len());
        self.faces.push(Face::new(d2));
        let mut walk = d2;
        loop {
            self.halfedge_mut(walk).face = g;
            walk = self.next(walk);
            if walk == d2 {
                break;
            }
        }

        d
    }

    // ==================== Validation ====================

    /// Check that all connectivity is consistent.
    ///
    /// Verifies pair storage (even half-edge count), `next`/`prev`
    /// reciprocity, vertex-pointer agreement, the positional-pairing
    /// invariant `start(next(h)) == start(pair(h))`, and that every face
    /// loop carries its own face id.
    pub fn is_valid(&self) -> bool {
        if self.halfedges.len() % 2 != 0 {
            return false;
        }

        for (i, v) in self.vertices.iter().enumerate() {
            if v.halfedge.is_valid() && self.start(v.halfedge).index() != i {
                return false;
            }
        }

        for he in self.halfedge_ids() {
            let rec = self.halfedge(he);
            if !rec.start.is_valid() || rec.start.index() >= self.vertices.len() {
                return false;
            }
            if !rec.next.is_valid() || !rec.prev.is_valid() {
                return false;
            }
            if self.prev(rec.next) != he || self.next(rec.prev) != he {
                return false;
            }
            // Destination consistency: following next lands on the
            // partner's start vertex.
            if self.start(rec.next) != self.dest(he) {
                return false;
            }
        }

        for f in self.face_ids() {
            let first = self.face(f).halfedge;
            if !first.is_valid() {
                return false;
            }
            let mut walk = first;
            let mut steps = 0;
            loop {
                if self.face_of(walk) != f {
                    return false;
                }
                walk = self.next(walk);
                steps += 1;
                if walk == first {
                    break;
                }
                if steps > self.halfedges.len() {
                    return false; // Unclosed face loop
                }
            }
        }

        true
    }
}

/// Iterator over outgoing half-edges around a vertex.
pub struct VertexHalfEdgeIter<'a> {
    mesh: &'a HalfEdgeMesh,
    start: HalfEdgeId,
    current: HalfEdgeId,
    done: bool,
}

impl<'a> VertexHalfEdgeIter<'a> {
    fn new(mesh: &'a HalfEdgeMesh, v: VertexId) -> Self {
        let start = mesh.vertex(v).halfedge;
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<'a> Iterator for VertexHalfEdgeIter<'a> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;

        // If he goes v -> w, its partner goes w -> v, and the partner's
        // next is the following outgoing half-edge of v.
        self.current = self.mesh.next(self.current.pair());

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}

/// Iterator over half-edges around a face.
pub struct FaceHalfEdgeIter<'a> {
    mesh: &'a HalfEdgeMesh,
    start: HalfEdgeId,
    current: HalfEdgeId,
    done: bool,
}

impl<'a> FaceHalfEdgeIter<'a> {
    fn new(mesh: &'a HalfEdgeMesh, f: FaceId) -> Self {
        let start = mesh.face(f).halfedge;
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<'a> Iterator for FaceHalfEdgeIter<'a> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;
        self.current = self.mesh.next(self.current);

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}
