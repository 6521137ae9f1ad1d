//! Scope chain for binding resolution.
//!
//! Frames mirror function/class/block nesting. A binding records what a local
//! name symbolically stands for relative to the component's data object.

use crate::path::{PathSegment, PropPath};
use crate::syntax::{Node, NodeLocation};
use indexmap::IndexMap;
use tracing::trace;

#[derive(Debug, Clone, PartialEq)]
pub enum BindingValue {
    /// The data object itself.
    RootProps,
    PropsPath(PropPath),
    /// `...rest` taken from `parent`, minus the sibling keys named next to it.
    RestOf {
        parent: PropPath,
        excluded: Vec<String>,
    },
    /// The component instance; its `props` member is `RootProps`.
    Instance,
    Opaque,
}

impl BindingValue {
    /// Path this value stands for, `Some(root)` for the data object.
    pub fn as_path(&self) -> Option<PropPath> {
        match self {
            BindingValue::RootProps => Some(PropPath::root()),
            BindingValue::PropsPath(path) => Some(path.clone()),
            _ => None,
        }
    }

    pub fn from_path(path: PropPath) -> Self {
        if path.is_root() {
            BindingValue::RootProps
        } else {
            BindingValue::PropsPath(path)
        }
    }

    /// Value of `self[segment]`.
    pub fn member(&self, segment: PathSegment) -> BindingValue {
        match self {
            BindingValue::RootProps | BindingValue::PropsPath(_) => match self.as_path() {
                Some(path) => BindingValue::PropsPath(path.child(segment)),
                None => BindingValue::Opaque,
            },
            BindingValue::RestOf { parent, excluded } => match &segment {
                PathSegment::Key(name) if !excluded.contains(name) => {
                    BindingValue::PropsPath(parent.child(segment))
                }
                _ => BindingValue::Opaque,
            },
            BindingValue::Instance => match &segment {
                PathSegment::Key(name) if name == "props" => BindingValue::RootProps,
                _ => BindingValue::Opaque,
            },
            BindingValue::Opaque => BindingValue::Opaque,
        }
    }

    pub fn is_props(&self) -> bool {
        matches!(
            self,
            BindingValue::RootProps | BindingValue::PropsPath(_) | BindingValue::RestOf { .. }
        )
    }
}

#[derive(Debug, Clone)]
pub struct Binding {
    pub value: BindingValue,
    pub location: NodeLocation,
    /// Referenced anywhere after its declaration.
    pub used: bool,
    /// Destructured or aliased path: recorded at its declaration when unused.
    pub tracked: bool,
}

/// How `this` resolves inside a function frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThisBinding {
    Component,
    Other,
    /// Arrow functions keep the enclosing `this`.
    Inherit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Function(ThisBinding),
    Block,
}

/// Function or class body queued until its enclosing block completes, so it
/// observes the block's final bindings.
#[derive(Debug, Clone)]
pub struct PendingBody<'a> {
    pub node: Node<'a>,
    pub this_binding: ThisBinding,
    /// Parameter index seeded with a value (`this.setState((s, props) => ..)`).
    pub seeds: Vec<(usize, BindingValue)>,
}

#[derive(Debug)]
pub struct Frame<'a> {
    pub kind: FrameKind,
    bindings: IndexMap<String, Binding>,
    pending: Vec<PendingBody<'a>>,
}

impl<'a> Frame<'a> {
    fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            bindings: IndexMap::new(),
            pending: Vec::new(),
        }
    }

    /// Tracked path bindings that nothing ever referenced.
    pub fn unused_paths(&self) -> Vec<(PropPath, NodeLocation)> {
        self.bindings
            .values()
            .filter(|binding| binding.tracked && !binding.used)
            .filter_map(|binding| match &binding.value {
                BindingValue::PropsPath(path) => Some((path.clone(), binding.location)),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct ScopeChain<'a> {
    frames: Vec<Frame<'a>>,
}

impl<'a> ScopeChain<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: FrameKind) {
        self.frames.push(Frame::new(kind));
    }

    pub fn pop(&mut self) -> Option<Frame<'a>> {
        self.frames.pop()
    }

    pub fn declare(
        &mut self,
        name: &str,
        value: BindingValue,
        location: NodeLocation,
        tracked: bool,
    ) {
        trace!(name, ?value, "declare binding");
        if let Some(frame) = self.frames.last_mut() {
            frame.bindings.insert(
                name.to_string(),
                Binding {
                    value,
                    location,
                    used: false,
                    tracked,
                },
            );
        }
    }

    fn lookup_mut(&mut self, name: &str) -> Option<&mut Binding> {
        self.frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.bindings.get_mut(name))
    }

    /// Resolves a reference and marks the binding as used.
    pub fn reference(&mut self, name: &str) -> BindingValue {
        match self.lookup_mut(name) {
            Some(binding) => {
                binding.used = true;
                binding.value.clone()
            }
            None => BindingValue::Opaque,
        }
    }

    /// Reassignment. Returns the previous path when it was never referenced,
    /// since that value is no longer reachable through the name.
    pub fn rebind(
        &mut self,
        name: &str,
        value: BindingValue,
        location: NodeLocation,
    ) -> Option<(PropPath, NodeLocation)> {
        let binding = self.lookup_mut(name)?;
        let flushed = match &binding.value {
            BindingValue::PropsPath(path) if !binding.used => Some((path.clone(), binding.location)),
            _ => None,
        };
        binding.tracked = matches!(value, BindingValue::PropsPath(_));
        binding.value = value;
        binding.used = false;
        binding.location = location;
        flushed
    }

    /// Value of `this` at the current position.
    pub fn this_value(&self) -> BindingValue {
        for frame in self.frames.iter().rev() {
            match frame.kind {
                FrameKind::Function(ThisBinding::Component) => return BindingValue::Instance,
                FrameKind::Function(ThisBinding::Other) => return BindingValue::Opaque,
                _ => {}
            }
        }
        BindingValue::Opaque
    }

    pub fn defer(&mut self, body: PendingBody<'a>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.pending.push(body);
        }
    }

    pub fn take_pending(&mut self) -> Vec<PendingBody<'a>> {
        self.frames
            .last_mut()
            .map(|frame| std::mem::take(&mut frame.pending))
            .unwrap_or_default()
    }
}
