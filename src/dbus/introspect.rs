//! Walk a service's object tree and collect what every object exposes.

use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::bus::Bus;
use super::error::Result;
use super::xml::{Arg, Interface, Member, Method, Node};

/// Object path of the tree root.
pub const ROOT_PATH: &str = "/";

/// Object path → what that object exposes.
///
/// Only objects declaring at least one interface have an entry.
pub type IntrospectionResult = BTreeMap<String, ObjectEntry>;

/// One object and its interfaces, keyed by interface name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectEntry {
    pub path: String,
    pub interfaces: BTreeMap<String, InterfaceDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct InterfaceDescriptor {
    #[serde(skip)]
    pub name: String,
    pub methods: Vec<MethodDescriptor>,
    pub signals: Vec<String>,
    pub properties: Vec<String>,
}

/// A method and its arguments in declaration order.
///
/// Serializes as `[name, [[arg, direction, type], ...]]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MethodDescriptor {
    pub name: String,
    pub args: Vec<ArgDescriptor>,
}

/// Serializes as `[name, direction, type]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArgDescriptor {
    pub name: String,
    pub direction: String,
    pub ty: String,
}

impl ArgDescriptor {
    pub fn new(name: &str, direction: &str, ty: &str) -> Self {
        Self {
            name: name.to_string(),
            direction: direction.to_string(),
            ty: ty.to_string(),
        }
    }

    /// Method arguments without a direction are inputs.
    pub fn is_out(&self) -> bool {
        self.direction == "out"
    }
}

impl MethodDescriptor {
    pub fn in_args(&self) -> impl Iterator<Item = &ArgDescriptor> {
        self.args.iter().filter(|arg| !arg.is_out())
    }

    pub fn out_args(&self) -> impl Iterator<Item = &ArgDescriptor> {
        self.args.iter().filter(|arg| arg.is_out())
    }

    /// Human readable signature, e.g. `Notify(s app_name, u id) -> (u id)`.
    pub fn signature(&self) -> String {
        let inputs = format_args_list(self.in_args());
        let outputs: Vec<_> = self.out_args().collect();
        if outputs.is_empty() {
            format!("{}({})", self.name, inputs)
        } else {
            format!(
                "{}({}) -> ({})",
                self.name,
                inputs,
                format_args_list(outputs.into_iter())
            )
        }
    }
}

fn format_args_list<'a>(args: impl Iterator<Item = &'a ArgDescriptor>) -> String {
    args.map(|arg| {
        if arg.name.is_empty() {
            arg.ty.clone()
        } else {
            format!("{} {}", arg.ty, arg.name)
        }
    })
    .collect::<Vec<_>>()
    .join(", ")
}

impl Serialize for MethodDescriptor {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.name)?;
        tuple.serialize_element(&self.args)?;
        tuple.end()
    }
}

impl Serialize for ArgDescriptor {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.name)?;
        tuple.serialize_element(&self.direction)?;
        tuple.serialize_element(&self.ty)?;
        tuple.end()
    }
}

impl From<&Arg> for ArgDescriptor {
    fn from(arg: &Arg) -> Self {
        ArgDescriptor::new(&arg.name, &arg.direction, &arg.ty)
    }
}

impl From<&Method> for MethodDescriptor {
    fn from(method: &Method) -> Self {
        MethodDescriptor {
            name: method.name.clone(),
            args: method.args.iter().map(ArgDescriptor::from).collect(),
        }
    }
}

impl From<&Interface> for InterfaceDescriptor {
    fn from(iface: &Interface) -> Self {
        let mut descriptor = InterfaceDescriptor {
            name: iface.name.clone(),
            ..Default::default()
        };
        for member in &iface.members {
            match member {
                Member::Method(method) => descriptor.methods.push(method.into()),
                Member::Signal(name) => descriptor.signals.push(name.clone()),
                Member::Property(name) => descriptor.properties.push(name.clone()),
            }
        }
        descriptor
    }
}

impl ObjectEntry {
    /// Entry for the object at `path`, or `None` if it declares no interfaces.
    ///
    /// Interfaces declared twice keep the later declaration.
    pub fn from_node(path: &str, node: &Node) -> Option<Self> {
        let interfaces: BTreeMap<_, _> = node
            .interfaces()
            .map(|iface| (iface.name.clone(), InterfaceDescriptor::from(iface)))
            .collect();

        if interfaces.is_empty() {
            None
        } else {
            Some(ObjectEntry {
                path: path.to_string(),
                interfaces,
            })
        }
    }
}

/// Absolute path of child `name` under `parent`. The root does not double
/// its slash: `/` + `Foo` is `/Foo`.
pub fn child_path(parent: &str, name: &str) -> String {
    if parent == ROOT_PATH {
        format!("/{}", name)
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Canonical form of a user-supplied starting path: empty means root, and a
/// trailing slash is dropped.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        ROOT_PATH.to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Introspect `service` from `path` downwards.
///
/// Objects are visited depth-first, parents before children, children in
/// document order. The first failing introspection call or unparseable
/// document aborts the walk.
///
/// There is no depth limit or cycle detection; a service reporting a cyclic
/// node graph is walked forever.
pub async fn get_objects(bus: &dyn Bus, service: &str, path: &str) -> Result<IntrospectionResult> {
    let mut found = IntrospectionResult::new();
    let mut pending = vec![normalize_path(path)];
    let mut visited = 0usize;

    while let Some(path) = pending.pop() {
        debug!("Introspecting {} {}", service, path);
        let xml = bus.introspect(service, &path).await?;
        let node = Node::parse(&xml)?;
        visited += 1;

        let mut children = Vec::new();
        for child in node.nodes() {
            match child.name.as_deref() {
                Some(name) if !name.is_empty() => children.push(child_path(&path, name)),
                _ => warn!("Skipping unnamed child node under {}", path),
            }
        }
        // Reversed so the stack pops them in document order.
        pending.extend(children.into_iter().rev());

        if let Some(entry) = ObjectEntry::from_node(&path, &node) {
            found.insert(path, entry);
        }
    }

    info!(
        "Introspected {}: {} objects visited, {} with interfaces",
        service,
        visited,
        found.len()
    );
    Ok(found)
}
