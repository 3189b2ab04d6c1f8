//! Token graphs.

use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};
use std::iter::FromIterator;
use std::ops::Index;

use petgraph::graph::{node_index, DiGraph};
use petgraph::visit::EdgeRef;
pub use petgraph::Direction;

use crate::error::GraphError;
use crate::table::Row;
use crate::value::Value;

/// Identifier of a vertex.
///
/// The identifier of a vertex is the index of the row that the vertex
/// was created from. Identifiers are displayed as `v[<index>]`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct VertexId(pub usize);

impl VertexId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for VertexId {
    fn fmt(&self, fmt: &mut Formatter) -> Result<(), fmt::Error> {
        write!(fmt, "v[{}]", self.0)
    }
}

impl From<usize> for VertexId {
    fn from(idx: usize) -> Self {
        VertexId(idx)
    }
}

/// Token graph vertex.
///
/// A vertex carries the features of its token as properties.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Vertex {
    properties: Row,
}

impl Vertex {
    pub fn new(properties: impl Into<Row>) -> Self {
        Vertex {
            properties: properties.into(),
        }
    }

    /// Get a property by its key.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn properties(&self) -> &Row {
        &self.properties
    }
}

/// A labeled link between two vertices.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct Link<S> {
    source: usize,
    target: usize,
    label: S,
}

impl<S> Link<S> {
    /// Construct a new link.
    pub fn new(source: usize, label: S, target: usize) -> Self {
        Link {
            source,
            target,
            label,
        }
    }

    pub fn source(&self) -> VertexId {
        VertexId(self.source)
    }

    pub fn target(&self) -> VertexId {
        VertexId(self.target)
    }
}

impl<S> Link<S>
where
    S: Borrow<str>,
{
    pub fn label(&self) -> &str {
        self.label.borrow()
    }
}

/// A graph of tokens.
///
/// Every vertex corresponds to a token. Edges are labeled relations
/// between tokens, such as a link from a token to its syntactic head.
///
/// This data structure is a thin wrapper around the `petgraph`
/// `DiGraph` data structure. Vertex identifiers are the node indices
/// of the wrapped graph. Vertices and links can only be added, so
/// identifiers stay stable.
#[derive(Clone, Debug, Default)]
pub struct TokenGraph {
    graph: DiGraph<Vertex, String>,
}

impl TokenGraph {
    /// Construct an empty graph.
    pub fn new() -> Self {
        TokenGraph::default()
    }

    /// Get a reference to the `DiGraph` of the token graph.
    pub fn get_ref(&self) -> &DiGraph<Vertex, String> {
        &self.graph
    }

    /// Unwrap the `DiGraph` of the token graph.
    pub fn into_inner(self) -> DiGraph<Vertex, String> {
        self.graph
    }

    /// Add a vertex for a token.
    ///
    /// Tokens should be added in table order, so that the identifier of
    /// a vertex is the index of its row.
    pub fn add_vertex(&mut self, properties: impl Into<Row>) -> VertexId {
        VertexId(self.graph.add_node(Vertex::new(properties)).index())
    }

    /// Add a link between two vertices.
    ///
    /// Multiple links between the same vertices are permitted.
    pub fn add_link<S>(&mut self, link: Link<S>) -> Result<(), GraphError>
    where
        S: Into<String>,
    {
        let vertex_count = self.graph.node_count();

        if link.source >= vertex_count {
            return Err(GraphError::SourceOutOfBounds {
                index: link.source,
                vertex_count,
            });
        }

        if link.target >= vertex_count {
            return Err(GraphError::TargetOutOfBounds {
                index: link.target,
                vertex_count,
            });
        }

        self.graph.add_edge(
            node_index(link.source),
            node_index(link.target),
            link.label.into(),
        );

        Ok(())
    }

    /// Get a vertex, returns `None` if the vertex does not exist.
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        // petgraph indices are 32-bit, larger identifiers would wrap.
        if id.0 >= self.graph.node_count() {
            return None;
        }

        self.graph.node_weight(node_index(id.0))
    }

    /// Get an iterator over the vertices, ordered by identifier.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.graph
            .node_indices()
            .map(move |idx| (VertexId(idx.index()), &self.graph[idx]))
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the number of links.
    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Get the links in the given direction of a vertex.
    ///
    /// Links are sorted by the vertex on the other end and then by
    /// label, so that iteration order does not depend on insertion
    /// order. Vertices that do not exist have no links.
    pub fn links(&self, id: VertexId, direction: Direction) -> Vec<Link<&str>> {
        if id.0 >= self.graph.node_count() {
            return Vec::new();
        }

        let mut links = self
            .graph
            .edges_directed(node_index(id.0), direction)
            .map(|e| Link::new(e.source().index(), e.weight().as_str(), e.target().index()))
            .collect::<Vec<_>>();

        match direction {
            Direction::Outgoing => links.sort_by_key(|l| (l.target, l.label)),
            Direction::Incoming => links.sort_by_key(|l| (l.source, l.label)),
        }

        links
    }
}

impl FromIterator<Row> for TokenGraph {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Row>,
    {
        let mut graph = TokenGraph::new();
        for row in iter {
            graph.add_vertex(row);
        }
        graph
    }
}

impl Index<VertexId> for TokenGraph {
    type Output = Vertex;

    fn index(&self, id: VertexId) -> &Self::Output {
        self.vertex(id)
            .unwrap_or_else(|| panic!("vertex {} does not exist", id))
    }
}
