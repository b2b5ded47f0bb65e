//! Read-only structural traversal.
//!
//! [`Hierarchy::accept`] walks a state, its transitions and its nested
//! states depth first. Visitors only ever see shared references, so a walk
//! cannot change the graph it walks.

use super::node::StateNode;
use super::transition::{Transition, TransitionKind};
use super::Hierarchy;
use super::StateIndex;
use crate::core::{EventId, StateId};
use serde::Serialize;

/// Hooks called during [`Hierarchy::accept`].
pub trait Visitor<S: StateId, E: EventId, C> {
    /// Called before the state's transitions and children are visited.
    fn visit_on_entry(&mut self, state: &StateNode<S, E, C>);

    /// Called after the state's children have been visited.
    fn visit_on_exit(&mut self, state: &StateNode<S, E, C>);

    fn visit_transition(&mut self, _transition: &Transition<S, E, C>) {}
}

impl<S: StateId, E: EventId, C> Hierarchy<S, E, C> {
    /// Visit `state`: the entry hook, every transition in registration
    /// order, every child recursively, then the exit hook.
    pub fn accept<V>(&self, state: StateIndex, visitor: &mut V)
    where
        V: Visitor<S, E, C> + ?Sized,
    {
        let node = self.node(state);
        visitor.visit_on_entry(node);
        for &transition in &node.transitions {
            self.transition(transition).accept(visitor);
        }
        for &child in &node.children {
            self.accept(child, visitor);
        }
        visitor.visit_on_exit(node);
    }

    /// Visit every root in registration order.
    pub fn accept_all<V>(&self, visitor: &mut V)
    where
        V: Visitor<S, E, C> + ?Sized,
    {
        for root in self.roots() {
            self.accept(root, visitor);
        }
    }

    /// Serializable outline of the whole hierarchy.
    pub fn diagram(&self) -> Vec<DiagramNode> {
        let mut visitor = DiagramVisitor::default();
        self.accept_all(&mut visitor);
        visitor.into_roots()
    }
}

/// One state in a diagram export.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiagramNode {
    pub id: String,
    pub level: usize,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_final: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transitions: Vec<DiagramTransition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DiagramNode>,
}

/// One transition in a diagram export.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiagramTransition {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub kind: TransitionKind,
    pub guarded: bool,
}

/// Builds a [`DiagramNode`] tree while visiting.
#[derive(Debug, Default)]
pub struct DiagramVisitor {
    stack: Vec<DiagramNode>,
    initials: Vec<Option<StateIndex>>,
    roots: Vec<DiagramNode>,
}

impl DiagramVisitor {
    pub fn into_roots(self) -> Vec<DiagramNode> {
        self.roots
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.roots)
    }
}

impl<S: StateId, E: EventId, C> Visitor<S, E, C> for DiagramVisitor {
    fn visit_on_entry(&mut self, state: &StateNode<S, E, C>) {
        self.stack.push(DiagramNode {
            id: state.id().name().to_string(),
            level: state.level(),
            is_final: state.is_final(),
            initial: None,
            transitions: Vec::new(),
            children: Vec::new(),
        });
        self.initials.push(state.child_initial());
    }

    fn visit_on_exit(&mut self, state: &StateNode<S, E, C>) {
        let (Some(mut node), Some(initial)) = (self.stack.pop(), self.initials.pop()) else {
            return;
        };
        if let Some(initial) = initial {
            node.initial = node
                .children
                .iter()
                .zip(state.children())
                .find(|(_, index)| **index == initial)
                .map(|(child, _)| child.id.clone());
        }
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.roots.push(node),
        }
    }

    fn visit_transition(&mut self, transition: &Transition<S, E, C>) {
        if let Some(node) = self.stack.last_mut() {
            node.transitions.push(DiagramTransition {
                event: format!("{:?}", transition.event()),
                target: transition.target_id().map(|t| t.name().to_string()),
                kind: transition.kind(),
                guarded: transition.has_guard(),
            });
        }
    }
}

/// Counts what a walk reaches.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StructureCounter {
    pub states: usize,
    pub transitions: usize,
    pub max_level: usize,
    depth: usize,
    pub max_depth: usize,
}

impl<S: StateId, E: EventId, C> Visitor<S, E, C> for StructureCounter {
    fn visit_on_entry(&mut self, state: &StateNode<S, E, C>) {
        self.states += 1;
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
        self.max_level = self.max_level.max(state.level());
    }

    fn visit_on_exit(&mut self, _state: &StateNode<S, E, C>) {
        self.depth -= 1;
    }

    fn visit_transition(&mut self, _transition: &Transition<S, E, C>) {
        self.transitions += 1;
    }
}
