//! Validated dependency graph over a task batch.

use std::collections::{HashMap, VecDeque};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use waveplan_core::{Task, TaskBatch, TaskId};

use crate::error::{Result, SchedulerError};

/// Node color during cycle-detecting depth-first traversal.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Not yet visited.
    White,
    /// On the active traversal path.
    Gray,
    /// Fully explored.
    Black,
}

/// Traversal frame for the iterative depth-first search.
enum Visit {
    Enter(NodeIndex),
    Exit(NodeIndex),
}

/// Immutable, validated task dependency graph.
///
/// Edges point from a dependency to the task that waits on it, so the
/// forward direction answers "what does this task block" and the reverse
/// direction answers "what does this task depend on".
#[derive(Debug, Clone)]
pub struct TaskGraph {
    graph: DiGraph<Task, ()>,
    nodes: HashMap<TaskId, NodeIndex>,
}

impl TaskGraph {
    /// Builds and validates the graph for a batch.
    ///
    /// Validation runs in stage order: duplicate ids are rejected before any
    /// edges exist, unknown dependency references are rejected while wiring
    /// edges, and cycles are rejected last, with the full cycle reconstructed
    /// for diagnosis.
    ///
    /// # Errors
    /// Returns [`SchedulerError::DuplicateId`], [`SchedulerError::UnknownDependency`],
    /// or [`SchedulerError::Cycle`].
    pub fn build(batch: &TaskBatch) -> Result<Self> {
        let mut graph = DiGraph::with_capacity(batch.len(), batch.len());
        let mut nodes = HashMap::with_capacity(batch.len());

        for task in batch.tasks() {
            if nodes.contains_key(&task.id) {
                return Err(SchedulerError::DuplicateId(task.id.clone()));
            }
            let node = graph.add_node(task.clone());
            nodes.insert(task.id.clone(), node);
        }

        for task in batch.tasks() {
            let task_node = nodes[&task.id];
            for dep_id in &task.depends_on {
                let Some(&dep_node) = nodes.get(dep_id) else {
                    return Err(SchedulerError::UnknownDependency {
                        task: task.id.clone(),
                        missing: dep_id.clone(),
                    });
                };
                graph.add_edge(dep_node, task_node, ());
            }
        }

        let built = Self { graph, nodes };
        if let Some(cycle) = built.find_cycle() {
            return Err(SchedulerError::Cycle(cycle));
        }
        Ok(built)
    }

    /// Looks up a task by id.
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.nodes.get(id).map(|&node| &self.graph[node])
    }

    /// All tasks in batch order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.graph.node_indices().map(|node| &self.graph[node])
    }

    /// Number of tasks in the graph.
    pub fn task_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Tasks the given task waits for (the forward `depends_on` index).
    pub fn dependencies(&self, id: &TaskId) -> Vec<&Task> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Tasks waiting on the given task (the reverse `blocks` index).
    pub fn dependents(&self, id: &TaskId) -> Vec<&Task> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Sink tasks: tasks nothing depends on, in batch order.
    pub fn sinks(&self) -> Vec<&Task> {
        self.graph
            .node_indices()
            .filter(|&node| {
                self.graph
                    .neighbors_directed(node, Direction::Outgoing)
                    .next()
                    .is_none()
            })
            .map(|node| &self.graph[node])
            .collect()
    }

    /// Tasks in topological order, dependencies before dependents.
    ///
    /// Uses in-degree peeling seeded in batch order, so the order is fully
    /// deterministic for a given batch.
    pub fn topo_order(&self) -> Vec<&Task> {
        let mut in_degree: HashMap<NodeIndex, usize> = self
            .graph
            .node_indices()
            .map(|node| {
                let degree = self
                    .graph
                    .neighbors_directed(node, Direction::Incoming)
                    .count();
                (node, degree)
            })
            .collect();

        let mut queue: VecDeque<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|node| in_degree[node] == 0)
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(node) = queue.pop_front() {
            order.push(&self.graph[node]);
            for dependent in self.graph.neighbors_directed(node, Direction::Outgoing) {
                if let Some(degree) = in_degree.get_mut(&dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(dependent);
                    }
                }
            }
        }
        order
    }

    fn neighbors(&self, id: &TaskId, direction: Direction) -> Vec<&Task> {
        self.nodes.get(id).map_or_else(Vec::new, |&node| {
            self.graph
                .neighbors_directed(node, direction)
                .map(|neighbor| &self.graph[neighbor])
                .collect()
        })
    }

    /// Three-color iterative depth-first search. Returns the first cycle
    /// found, as task ids in cycle order, or `None` for an acyclic graph.
    fn find_cycle(&self) -> Option<Vec<TaskId>> {
        let mut colors: HashMap<NodeIndex, Color> = self
            .graph
            .node_indices()
            .map(|node| (node, Color::White))
            .collect();
        let mut path: Vec<NodeIndex> = Vec::new();
        let mut stack: Vec<Visit> = Vec::new();

        for root in self.graph.node_indices() {
            if colors[&root] != Color::White {
                continue;
            }
            stack.push(Visit::Enter(root));

            while let Some(frame) = stack.pop() {
                match frame {
                    Visit::Enter(node) => match colors[&node] {
                        Color::Black => {}
                        // A gray node reached again is an ancestor on the
                        // active path: unwind the path to reconstruct the cycle.
                        Color::Gray => {
                            let start = path.iter().position(|&ancestor| ancestor == node)?;
                            return Some(
                                path[start..]
                                    .iter()
                                    .map(|&ancestor| self.graph[ancestor].id.clone())
                                    .collect(),
                            );
                        }
                        Color::White => {
                            colors.insert(node, Color::Gray);
                            path.push(node);
                            stack.push(Visit::Exit(node));
                            for child in self.graph.neighbors_directed(node, Direction::Outgoing) {
                                stack.push(Visit::Enter(child));
                            }
                        }
                    },
                    Visit::Exit(node) => {
                        colors.insert(node, Color::Black);
                        path.pop();
                    }
                }
            }
        }
        None
    }
}
