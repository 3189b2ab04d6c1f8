//! Gremlin-style traversals over token graphs.
//!
//! A traversal starts at a `TraversalSource`, conventionally named `g`:
//!
//! ```
//! use tokgraph::table::{Row, RowBuilder, TokenTable};
//! use tokgraph_gremlin::token_features_to_traversal;
//!
//! let table: TokenTable = vec![
//!     RowBuilder::new().str("text", "Gilles").str("tag", "NNP").int("head", 1),
//!     RowBuilder::new().str("text", "writes").str("tag", "VBZ").int("head", 1),
//! ]
//! .into_iter()
//! .map(Row::from)
//! .collect();
//!
//! let g = token_features_to_traversal(&table).unwrap();
//! let result = g.v().has("tag", "NNP").as_("src").to_list().unwrap();
//! assert_eq!(result.len(), 1);
//! assert_eq!(result[0].to_string(), "v[0]");
//! ```
//!
//! Traversals are lazy: steps are only recorded until a terminal step
//! such as `to_list` is called. Every terminal step evaluates the
//! traversal from the start, so a traversal can be evaluated any number
//! of times.

use std::collections::{BTreeMap, HashSet};
use std::fmt::{self, Display, Formatter};

use itertools::Itertools;
use tokgraph::graph::{Direction, TokenGraph, VertexId};
use tokgraph::value::Value;

use crate::error::TraversalError;
use crate::predicate::P;

/// An element produced by a traversal.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Element {
    /// A vertex, displayed as `v[<index>]`.
    Vertex(VertexId),

    /// A property value.
    Value(Value),

    /// Labeled elements, produced by selecting multiple labels.
    Map(BTreeMap<String, Element>),
}

impl Element {
    pub fn vertex_id(&self) -> Option<VertexId> {
        match self {
            Element::Vertex(id) => Some(*id),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Element::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn map(&self) -> Option<&BTreeMap<String, Element>> {
        match self {
            Element::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        match self {
            Element::Vertex(id) => write!(f, "{}", id),
            Element::Value(Value::Str(s)) => write!(f, "{}", s),
            Element::Value(value) => write!(f, "{}", value),
            Element::Map(map) => write!(
                f,
                "{{{}}}",
                map.iter()
                    .map(|(label, element)| format!("{}={}", label, element))
                    .join(", ")
            ),
        }
    }
}

impl From<VertexId> for Element {
    fn from(id: VertexId) -> Self {
        Element::Vertex(id)
    }
}

impl From<Value> for Element {
    fn from(value: Value) -> Self {
        Element::Value(value)
    }
}

/// The entry point of traversals.
///
/// The traversal source owns the graph that is traversed. Since
/// traversals only borrow the source immutably, any number of
/// traversals can run over the same source, also from multiple
/// threads.
#[derive(Clone, Debug)]
pub struct TraversalSource {
    graph: TokenGraph,
}

impl TraversalSource {
    pub fn new(graph: TokenGraph) -> Self {
        TraversalSource { graph }
    }

    /// Get the traversed graph.
    pub fn graph(&self) -> &TokenGraph {
        &self.graph
    }

    /// Unwrap the traversed graph.
    pub fn into_inner(self) -> TokenGraph {
        self.graph
    }

    /// Start a traversal at all vertices, in identifier order.
    ///
    /// This is the Gremlin `V()` step.
    pub fn v(&self) -> Traversal {
        Traversal::new(self, Start::All)
    }

    /// Start a traversal at the given vertices, in the given order.
    ///
    /// Identifiers of vertices that are not in the graph are skipped.
    pub fn v_ids<I, V>(&self, ids: I) -> Traversal
    where
        I: IntoIterator<Item = V>,
        V: Into<VertexId>,
    {
        Traversal::new(self, Start::Ids(ids.into_iter().map(Into::into).collect()))
    }
}

impl From<TokenGraph> for TraversalSource {
    fn from(graph: TokenGraph) -> Self {
        TraversalSource::new(graph)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Start {
    All,
    Ids(Vec<VertexId>),
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Step {
    Has(String, P),
    HasKey(String),
    HasNot(String),
    As(String),
    Out(Vec<String>),
    In(Vec<String>),
    Both(Vec<String>),
    Values(String),
    Select(Vec<String>),
    Dedup,
    Limit(usize),
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Step::Has(..) => "has",
            Step::HasKey(_) => "hasKey",
            Step::HasNot(_) => "hasNot",
            Step::As(_) => "as",
            Step::Out(_) => "out",
            Step::In(_) => "in",
            Step::Both(_) => "both",
            Step::Values(_) => "values",
            Step::Select(_) => "select",
            Step::Dedup => "dedup",
            Step::Limit(_) => "limit",
        }
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}(", self.name())?;
        match self {
            Step::Has(key, p) => write!(f, "{:?},{}", key, p)?,
            Step::HasKey(key) | Step::HasNot(key) | Step::As(key) | Step::Values(key) => {
                write!(f, "{:?}", key)?
            }
            Step::Out(labels) | Step::In(labels) | Step::Both(labels) | Step::Select(labels) => {
                write!(f, "{}", labels.iter().map(|l| format!("{:?}", l)).join(","))?
            }
            Step::Dedup => (),
            Step::Limit(n) => write!(f, "{}", n)?,
        }
        write!(f, ")")
    }
}

/// A traverser: the current element plus the elements bound to labels
/// earlier in the traversal.
#[derive(Clone, Debug)]
struct Traverser {
    element: Element,
    labels: BTreeMap<String, Element>,
}

impl Traverser {
    fn new(element: Element) -> Self {
        Traverser {
            element,
            labels: BTreeMap::new(),
        }
    }

    fn with_element(&self, element: Element) -> Self {
        Traverser {
            element,
            labels: self.labels.clone(),
        }
    }
}

type Traversers<'g> = Box<dyn Iterator<Item = Result<Traverser, TraversalError>> + 'g>;

/// A traversal.
///
/// Steps are added with the builder-style methods of this type. Nothing
/// is evaluated until a terminal step (`iter`, `to_list`, `count` or
/// `first`) is called.
#[derive(Clone, Debug)]
pub struct Traversal<'g> {
    source: &'g TraversalSource,
    start: Start,
    steps: Vec<Step>,
}

impl<'g> Traversal<'g> {
    fn new(source: &'g TraversalSource, start: Start) -> Self {
        Traversal {
            source,
            start,
            steps: Vec::new(),
        }
    }

    fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Keep vertices that have property `key` with a value satisfying
    /// `predicate`.
    ///
    /// Values convert into equality predicates, so `has("tag", "NNP")`
    /// keeps vertices that are tagged `NNP`.
    pub fn has(self, key: impl Into<String>, predicate: impl Into<P>) -> Self {
        self.step(Step::Has(key.into(), predicate.into()))
    }

    /// Keep vertices that have property `key`.
    pub fn has_key(self, key: impl Into<String>) -> Self {
        self.step(Step::HasKey(key.into()))
    }

    /// Keep vertices that do not have property `key`.
    pub fn has_not(self, key: impl Into<String>) -> Self {
        self.step(Step::HasNot(key.into()))
    }

    /// Label the current element, so that it can be selected later.
    pub fn as_(self, label: impl Into<String>) -> Self {
        self.step(Step::As(label.into()))
    }

    /// Move to the targets of outgoing links with one of the given labels.
    ///
    /// All links are followed when no labels are given.
    pub fn out<I, S>(self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.step(Step::Out(labels.into_iter().map(Into::into).collect()))
    }

    /// Move to the sources of incoming links with one of the given labels.
    ///
    /// All links are followed when no labels are given.
    pub fn in_<I, S>(self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.step(Step::In(labels.into_iter().map(Into::into).collect()))
    }

    /// Move along links in both directions.
    pub fn both<I, S>(self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.step(Step::Both(labels.into_iter().map(Into::into).collect()))
    }

    /// Replace vertices by the value of their property `key`.
    ///
    /// Vertices without the property are dropped.
    pub fn values(self, key: impl Into<String>) -> Self {
        self.step(Step::Values(key.into()))
    }

    /// Replace the current element by labeled elements.
    ///
    /// With a single label, the element bound to that label is produced.
    /// With multiple labels, a map from labels to elements is produced.
    /// Evaluation fails with `TraversalError::EmptySelect` when no labels
    /// are given.
    pub fn select<I, S>(self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.step(Step::Select(labels.into_iter().map(Into::into).collect()))
    }

    /// Remove duplicate elements.
    pub fn dedup(self) -> Self {
        self.step(Step::Dedup)
    }

    /// Produce at most `n` elements.
    pub fn limit(self, n: usize) -> Self {
        self.step(Step::Limit(n))
    }

    /// Get a lazy iterator over the results of the traversal.
    pub fn iter(&self) -> impl Iterator<Item = Result<Element, TraversalError>> + 'g {
        let source: &'g TraversalSource = self.source;
        let graph = source.graph();

        let start: Traversers<'g> = match &self.start {
            Start::All => Box::new(
                graph
                    .vertices()
                    .map(|(id, _)| Ok(Traverser::new(Element::Vertex(id)))),
            ),
            Start::Ids(ids) => Box::new(
                ids.clone()
                    .into_iter()
                    .filter(move |&id| graph.vertex(id).is_some())
                    .map(|id| Ok(Traverser::new(Element::Vertex(id)))),
            ),
        };

        self.steps
            .iter()
            .cloned()
            .fold(start, |traversers, step| apply(graph, traversers, step))
            .map_ok(|traverser| traverser.element)
    }

    /// Evaluate the traversal, collecting its results in order.
    pub fn to_list(&self) -> Result<Vec<Element>, TraversalError> {
        let result = self.iter().collect::<Result<Vec<_>, _>>();

        match &result {
            Ok(elements) => {
                tracing::debug!(traversal = %self, results = elements.len(), "evaluated traversal")
            }
            Err(err) => tracing::debug!(traversal = %self, error = %err, "traversal failed"),
        }

        result
    }

    /// Count the results of the traversal.
    pub fn count(&self) -> Result<usize, TraversalError> {
        self.iter().try_fold(0, |count, element| element.map(|_| count + 1))
    }

    /// Get the first result of the traversal, if any.
    pub fn first(&self) -> Result<Option<Element>, TraversalError> {
        self.iter().next().transpose()
    }
}

impl<'g> Display for Traversal<'g> {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        match &self.start {
            Start::All => write!(f, "g.V()")?,
            Start::Ids(ids) => write!(f, "g.V({})", ids.iter().map(|id| id.index()).join(","))?,
        }

        for step in &self.steps {
            write!(f, ".{}", step)?;
        }

        Ok(())
    }
}

fn apply<'g>(graph: &'g TokenGraph, traversers: Traversers<'g>, step: Step) -> Traversers<'g> {
    let name = step.name();

    match step {
        Step::Has(key, predicate) => try_flat_map(traversers, move |t| {
            let keep = property(graph, &t, name, &key)?
                .map(|value| predicate.test(value))
                .unwrap_or(false);
            Ok(if keep { Some(t) } else { None })
        }),
        Step::HasKey(key) => try_flat_map(traversers, move |t| {
            Ok(property(graph, &t, name, &key)?.map(|_| t))
        }),
        Step::HasNot(key) => try_flat_map(traversers, move |t| {
            Ok(if property(graph, &t, name, &key)?.is_none() {
                Some(t)
            } else {
                None
            })
        }),
        Step::As(label) => Box::new(traversers.map_ok(move |mut t| {
            t.labels.insert(label.clone(), t.element.clone());
            t
        })),
        Step::Out(labels) => try_flat_map(traversers, move |t| {
            adjacent(graph, &t, name, &[Direction::Outgoing], &labels)
        }),
        Step::In(labels) => try_flat_map(traversers, move |t| {
            adjacent(graph, &t, name, &[Direction::Incoming], &labels)
        }),
        Step::Both(labels) => try_flat_map(traversers, move |t| {
            adjacent(
                graph,
                &t,
                name,
                &[Direction::Outgoing, Direction::Incoming],
                &labels,
            )
        }),
        Step::Values(key) => try_flat_map(traversers, move |t| {
            Ok(property(graph, &t, name, &key)?
                .map(|value| t.with_element(Element::Value(value.clone()))))
        }),
        Step::Select(labels) => try_flat_map(traversers, move |t| {
            let element = select(&t, &labels)?;
            Ok(Some(t.with_element(element)))
        }),
        Step::Dedup => {
            let mut seen = HashSet::new();
            try_flat_map(traversers, move |t| {
                Ok(if seen.insert(t.element.clone()) {
                    Some(t)
                } else {
                    None
                })
            })
        }
        Step::Limit(n) => Box::new(traversers.take(n)),
    }
}

/// Replace every traverser by zero or more traversers, stopping at
/// the first error.
fn try_flat_map<'g, F, I>(traversers: Traversers<'g>, mut f: F) -> Traversers<'g>
where
    F: FnMut(Traverser) -> Result<I, TraversalError> + 'g,
    I: IntoIterator<Item = Traverser> + 'g,
    I::IntoIter: 'g,
{
    Box::new(traversers.map(move |t| t.and_then(&mut f)).flatten_ok())
}

fn vertex_id(traverser: &Traverser, step: &'static str) -> Result<VertexId, TraversalError> {
    match &traverser.element {
        Element::Vertex(id) => Ok(*id),
        element => Err(TraversalError::NotAVertex {
            step,
            element: element.to_string(),
        }),
    }
}

/// Get a property of the traverser's vertex.
fn property<'g>(
    graph: &'g TokenGraph,
    traverser: &Traverser,
    step: &'static str,
    key: &str,
) -> Result<Option<&'g Value>, TraversalError> {
    let id = vertex_id(traverser, step)?;
    Ok(graph.vertex(id).and_then(|vertex| vertex.property(key)))
}

/// Get the traversers for the vertices adjacent to the traverser's
/// vertex, ordered by vertex identifier.
fn adjacent(
    graph: &TokenGraph,
    traverser: &Traverser,
    step: &'static str,
    directions: &[Direction],
    labels: &[String],
) -> Result<Vec<Traverser>, TraversalError> {
    let id = vertex_id(traverser, step)?;

    let mut neighbors = directions
        .iter()
        .flat_map(move |&direction| {
            graph
                .links(id, direction)
                .into_iter()
                .filter(move |link| labels.is_empty() || labels.iter().any(|l| l == link.label()))
                .map(move |link| match direction {
                    Direction::Outgoing => link.target(),
                    Direction::Incoming => link.source(),
                })
        })
        .collect::<Vec<_>>();
    neighbors.sort();

    Ok(neighbors
        .into_iter()
        .map(|id| traverser.with_element(Element::Vertex(id)))
        .collect())
}

fn select(traverser: &Traverser, labels: &[String]) -> Result<Element, TraversalError> {
    let lookup = |label: &String| {
        traverser
            .labels
            .get(label)
            .cloned()
            .ok_or_else(|| TraversalError::UnknownLabel {
                label: label.clone(),
            })
    };

    match labels {
        [] => Err(TraversalError::EmptySelect),
        [label] => lookup(label),
        labels => labels
            .iter()
            .map(|label| lookup(label).map(|element| (label.clone(), element)))
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(Element::Map),
    }
}

#[cfg(test)]
mod tests {
    use maplit::btreemap;
    use tokgraph::graph::VertexId;
    use tokgraph::value::Value;

    use super::{Element, TraversalSource};
    use crate::error::TraversalError;
    use crate::predicate::P;
    use crate::tests::{item_source, ITEM_TABLE};

    fn ids(elements: &[Element]) -> Vec<String> {
        elements.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn all_vertices_in_row_order() {
        let g = item_source();
        let result = g.v().to_list().unwrap();
        assert_eq!(
            ids(&result),
            vec!["v[0]", "v[1]", "v[2]", "v[3]", "v[4]", "v[5]", "v[6]", "v[7]"]
        );
        assert_eq!(result.len(), ITEM_TABLE.len());
    }

    #[test]
    fn v_is_restartable() {
        let g = item_source();
        let t = g.v().has("pos", P::within(vec!["NUM", "SYM"]));
        assert_eq!(t.to_list().unwrap(), t.to_list().unwrap());
        assert_eq!(g.v().to_list().unwrap(), g.v().to_list().unwrap());
        assert_eq!(t.count().unwrap(), 2);
    }

    #[test]
    fn has_selects_matching_rows_in_order() {
        let g = item_source();

        for column in ITEM_TABLE.columns() {
            for (idx, row) in ITEM_TABLE.iter().enumerate() {
                let value = row[column].clone();
                let expected = ITEM_TABLE
                    .iter()
                    .enumerate()
                    .filter(|(_, r)| r[column] == value)
                    .map(|(i, _)| Element::Vertex(VertexId(i)))
                    .collect::<Vec<_>>();
                let result = g.v().has(column, value).to_list().unwrap();
                assert!(result.contains(&Element::Vertex(VertexId(idx))));
                assert_eq!(result, expected);
            }
        }
    }

    #[test]
    fn has_absent_value_is_empty() {
        let g = item_source();
        assert!(g.v().has("tag", "UH").to_list().unwrap().is_empty());
        assert!(g.v().has("text", 100).to_list().unwrap().is_empty());
        assert!(g.v().has("nonexistent", "NNP").to_list().unwrap().is_empty());
        assert_eq!(g.v().has("tag", "UH").first().unwrap(), None);
    }

    #[test]
    fn has_key_and_has_not() {
        let g = item_source();
        assert_eq!(g.v().has_key("tag").count().unwrap(), 8);
        assert_eq!(g.v().has_not("tag").count().unwrap(), 0);
        assert_eq!(g.v().has_not("nonexistent").count().unwrap(), 8);
    }

    #[test]
    fn out_follows_links_to_heads() {
        let g = item_source();
        let result = g.v().has("text", "Item").out(vec!["head"]).to_list().unwrap();
        assert_eq!(ids(&result), vec!["v[1]"]);

        // The root does not link to itself.
        let result = g.v().has("dep", "ROOT").out(Vec::<String>::new()).to_list();
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn in_collects_dependents_in_order() {
        let g = item_source();
        let result = g.v().has("text", "100").in_(vec!["head"]).to_list().unwrap();
        assert_eq!(ids(&result), vec!["v[4]", "v[6]", "v[7]"]);

        assert!(g
            .v()
            .has("text", "100")
            .in_(vec!["nonexistent"])
            .to_list()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn both() {
        let g = item_source();
        let result = g.v_ids(vec![2usize]).both(Vec::<String>::new()).to_list().unwrap();
        assert_eq!(ids(&result), vec!["v[1]", "v[3]", "v[5]"]);
    }

    #[test]
    fn v_ids_skips_unknown_vertices() {
        let g = item_source();
        let result = g.v_ids(vec![5usize, 100, 0]).to_list().unwrap();
        assert_eq!(ids(&result), vec!["v[5]", "v[0]"]);
    }

    #[test]
    fn v_ids_does_not_wrap_large_ids() {
        let g = item_source();
        let t = g.v_ids(vec![(1usize << 32) + 3]);
        assert!(t.to_list().unwrap().is_empty());
        assert!(t.values("text").to_list().unwrap().is_empty());
    }

    #[test]
    fn values() {
        let g = item_source();
        let result = g
            .v()
            .has("tag", P::starting_with("NN"))
            .values("text")
            .to_list()
            .unwrap();
        assert_eq!(
            result,
            vec![
                Element::Value(Value::from("Item")),
                Element::Value(Value::from("change"))
            ]
        );
        assert_eq!(ids(&result), vec!["Item", "change"]);
    }

    #[test]
    fn select_labels() {
        let g = item_source();

        let t = g
            .v()
            .has("tag", "CC")
            .as_("dep")
            .out(vec!["head"])
            .as_("head");
        assert_eq!(
            t.clone().select(vec!["dep"]).to_list().unwrap(),
            vec![Element::Vertex(VertexId(6))]
        );

        let result = t.select(vec!["dep", "head"]).to_list().unwrap();
        assert_eq!(
            result,
            vec![Element::Map(btreemap! {
                "dep".to_owned() => Element::Vertex(VertexId(6)),
                "head".to_owned() => Element::Vertex(VertexId(5)),
            })]
        );
        assert_eq!(result[0].to_string(), "{dep=v[6], head=v[5]}");
    }

    #[test]
    fn select_unknown_label_fails() {
        let g = item_source();
        assert_eq!(
            g.v().as_("src").select(vec!["dst"]).to_list(),
            Err(TraversalError::UnknownLabel {
                label: "dst".to_owned()
            })
        );
    }

    #[test]
    fn select_without_labels_fails() {
        let g = item_source();
        assert_eq!(
            g.v().as_("src").select(Vec::<String>::new()).first(),
            Err(TraversalError::EmptySelect)
        );
    }

    #[test]
    fn vertex_step_on_value_fails() {
        let g = item_source();
        assert_eq!(
            g.v().values("tag").out(vec!["head"]).first(),
            Err(TraversalError::NotAVertex {
                step: "out",
                element: "NNP".to_owned()
            })
        );
    }

    #[test]
    fn dedup_and_limit() {
        let g = item_source();
        let heads = g.v().out(vec!["head"]).dedup().to_list().unwrap();
        assert_eq!(ids(&heads), vec!["v[1]", "v[2]", "v[5]"]);

        let tags = g.v().values("pos").dedup().limit(3).to_list().unwrap();
        assert_eq!(ids(&tags), vec!["PROPN", "AUX", "ADP"]);
    }

    #[test]
    fn display() {
        let g = item_source();
        assert_eq!(
            g.v().has("tag", "NNP").as_("src").to_string(),
            "g.V().has(\"tag\",eq(\"NNP\")).as(\"src\")"
        );
        assert_eq!(
            g.v_ids(vec![0usize, 1])
                .out(vec!["head"])
                .select(vec!["a", "b"])
                .dedup()
                .limit(2)
                .to_string(),
            "g.V(0,1).out(\"head\").select(\"a\",\"b\").dedup().limit(2)"
        );
    }

    #[test]
    fn source_is_shareable_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TraversalSource>();

        let g = item_source();
        std::thread::scope(|s| {
            let handles = (0..4)
                .map(|_| s.spawn(|| g.v().has("tag", "NNP").to_list().unwrap()))
                .collect::<Vec<_>>();
            for handle in handles {
                assert_eq!(ids(&handle.join().unwrap()), vec!["v[0]"]);
            }
        });
    }
}
