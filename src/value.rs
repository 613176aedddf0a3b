// ABOUTME: Runtime value representation, structural equality, and type-match checking

use crate::ast::{Function, TypeName};
use crate::handles::{ChannelHandle, SharedSocket, SharedWsStream};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// `VMap`'s hashtable plus insertion-ordered key list, kept in sync on every
/// set/delete.
#[derive(Debug, Default, Clone)]
pub struct OrderedMap {
    keys: Vec<String>,
    entries: HashMap<String, Value>,
}

impl OrderedMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: String, value: Value) {
        if !self.entries.contains_key(&key) {
            self.keys.push(key.clone());
        }
        self.entries.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn delete(&mut self, key: &str) -> Option<Value> {
        if let Some(pos) = self.keys.iter().position(|k| k == key) {
            self.keys.remove(pos);
        }
        self.entries.remove(key)
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.keys.iter().map(move |k| (k, self.entries.get(k).unwrap()))
    }
}

#[derive(Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Decimal(String),
    Str(String),
    Bool(bool),
    Unit,
    Array(Rc<RefCell<Vec<Value>>>),
    Map(Rc<RefCell<OrderedMap>>),
    Function(Rc<Function>),
    Socket(SharedSocket),
    TlsSocket(Rc<RefCell<Option<native_tls::TlsStream<std::net::TcpStream>>>>),
    WsSocket(SharedWsStream),
    Channel(ChannelHandle),
    Process(u32),
}

impl Value {
    pub fn new_array(items: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    pub fn new_map(map: OrderedMap) -> Value {
        Value::Map(Rc::new(RefCell::new(map)))
    }

    /// One of the names `type_of` returns, or `"unknown"` for carrier types
    /// that have no single-word reflection name.
    pub fn type_of_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::Str(_) => "string",
            Value::Bool(_) => "bool",
            Value::Unit => "unit",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            _ => "unknown",
        }
    }

    /// Short label used in error messages (`TypeMismatch { actual, .. }`, etc).
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::Str(_) => "string",
            Value::Bool(_) => "bool",
            Value::Unit => "unit",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Function(_) => "function",
            Value::Socket(_) => "socket",
            Value::TlsSocket(_) => "tls-socket",
            Value::WsSocket(_) => "ws-socket",
            Value::Channel(_) => "channel",
            Value::Process(_) => "process",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>", self.kind_name(), string_of_value(self))
    }
}

/// Checks whether `value`'s runtime kind matches a declared type annotation.
pub fn type_matches(declared: &TypeName, value: &Value) -> bool {
    match declared {
        TypeName::Int => matches!(value, Value::Int(_)),
        TypeName::Float => matches!(value, Value::Float(_)),
        TypeName::Decimal => matches!(value, Value::Decimal(_)),
        TypeName::String => matches!(value, Value::Str(_)),
        TypeName::Bool => matches!(value, Value::Bool(_)),
        TypeName::Unit => matches!(value, Value::Unit),
        TypeName::Array => matches!(value, Value::Array(_)),
        TypeName::Map => matches!(value, Value::Map(_)),
        TypeName::Json => true,
        TypeName::Regex => matches!(value, Value::Str(_)),
        TypeName::Process => matches!(value, Value::Process(_) | Value::Channel(_)),
        TypeName::Socket => matches!(
            value,
            Value::Socket(_) | Value::TlsSocket(_) | Value::WsSocket(_) | Value::Channel(_)
        ),
        TypeName::Function => matches!(value, Value::Function(_)),
        TypeName::Channel => matches!(
            value,
            Value::Channel(_) | Value::Socket(_) | Value::TlsSocket(_) | Value::WsSocket(_)
        ),
    }
}

/// Structural equality used by `eq`/`ne` and the test-spec runner. Arrays
/// compare element-wise in order; maps compare key sets and values without
/// regard to insertion order.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::Decimal(x), Value::Decimal(y)) => {
            crate::bigdecimal::compare(x, y).map(|c| c == 0).unwrap_or(false)
        }
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Unit, Value::Unit) => true,
        (Value::Array(x), Value::Array(y)) => {
            let xb = x.borrow();
            let yb = y.borrow();
            xb.len() == yb.len() && xb.iter().zip(yb.iter()).all(|(a, b)| values_equal(a, b))
        }
        (Value::Map(x), Value::Map(y)) => {
            let xb = x.borrow();
            let yb = y.borrow();
            if xb.len() != yb.len() {
                return false;
            }
            xb.keys().iter().all(|k| match (xb.get(k), yb.get(k)) {
                (Some(va), Some(vb)) => values_equal(va, vb),
                _ => false,
            })
        }
        (Value::Process(x), Value::Process(y)) => x == y,
        // These carriers have no meaningful structural equality (a live fd,
        // TLS stream, or socket can't be compared field-by-field), but every
        // value must equal itself — compare by identity of the underlying
        // shared resource instead. `Function` has no `Rc` the evaluator
        // guarantees is reused across lookups of the same name, so it
        // compares by name instead of pointer.
        (Value::Function(x), Value::Function(y)) => x.name == y.name,
        (Value::Socket(x), Value::Socket(y)) => Rc::ptr_eq(x, y),
        (Value::TlsSocket(x), Value::TlsSocket(y)) => Rc::ptr_eq(x, y),
        (Value::WsSocket(x), Value::WsSocket(y)) => Rc::ptr_eq(x, y),
        (Value::Channel(x), Value::Channel(y)) => {
            Rc::ptr_eq(&x.write, &y.write) && Rc::ptr_eq(&x.read, &y.read) && x.pid == y.pid
        }
        _ => false,
    }
}

/// Independent recursive copy of arrays/maps; other kinds are already
/// value-like under `Clone`.
pub fn deep_copy_value(v: &Value) -> Value {
    match v {
        Value::Array(items) => {
            let copied: Vec<Value> = items.borrow().iter().map(deep_copy_value).collect();
            Value::new_array(copied)
        }
        Value::Map(map) => {
            let mut copied = OrderedMap::new();
            for (k, val) in map.borrow().entries() {
                copied.set(k.clone(), deep_copy_value(val));
            }
            Value::new_map(copied)
        }
        other => other.clone(),
    }
}

/// Canonical textual rendering used by `print`/`println` and test-runner diffs.
pub fn string_of_value(v: &Value) -> String {
    match v {
        Value::Int(i) => i.to_string(),
        Value::Float(f) => {
            if f.fract() == 0.0 && f.is_finite() {
                format!("{f:.1}")
            } else {
                f.to_string()
            }
        }
        Value::Decimal(s) => s.clone(),
        Value::Str(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Unit => "unit".to_string(),
        Value::Array(items) => {
            let rendered: Vec<String> = items.borrow().iter().map(string_of_value).collect();
            format!("[{}]", rendered.join(", "))
        }
        Value::Map(map) => {
            let rendered: Vec<String> = map
                .borrow()
                .entries()
                .map(|(k, v)| format!("{k}: {}", string_of_value(v)))
                .collect();
            format!("{{{}}}", rendered.join(", "))
        }
        Value::Function(f) => format!("<function {}>", f.name),
        Value::Socket(_) => "<socket>".to_string(),
        Value::TlsSocket(_) => "<tls-socket>".to_string(),
        Value::WsSocket(_) => "<ws-socket>".to_string(),
        Value::Channel(_) => "<channel>".to_string(),
        Value::Process(pid) => format!("<process {pid}>"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Function, TypeName};

    fn sample_function() -> Rc<Function> {
        Rc::new(Function {
            name: "f".to_string(),
            params: vec![],
            return_type: TypeName::Unit,
            body: vec![],
        })
    }

    #[test]
    fn values_equal_is_reflexive() {
        let v = Value::new_array(vec![Value::Int(1), Value::Str("x".into())]);
        assert!(values_equal(&v, &v));
    }

    #[test]
    fn values_equal_is_reflexive_for_function_values() {
        let f = Value::Function(sample_function());
        assert!(values_equal(&f, &f));
    }

    #[test]
    fn values_equal_is_reflexive_for_carrier_values() {
        use crate::handles::ChannelHandle;

        let socket = Value::Socket(Rc::new(RefCell::new(None)));
        assert!(values_equal(&socket, &socket));

        let ws = Value::WsSocket(Rc::new(RefCell::new(None)));
        assert!(values_equal(&ws, &ws));

        let channel = Value::Channel(ChannelHandle {
            write: Rc::new(RefCell::new(None)),
            read: Rc::new(RefCell::new(None)),
            pid: Some(1),
        });
        assert!(values_equal(&channel, &channel));

        // Two distinct sockets are never equal, even with identical (empty)
        // contents — carrier equality is identity-based, not structural.
        let other_socket = Value::Socket(Rc::new(RefCell::new(None)));
        assert!(!values_equal(&socket, &other_socket));
    }

    #[test]
    fn array_equality_is_elementwise_and_ordered() {
        let a = Value::new_array(vec![Value::Int(1), Value::Int(2)]);
        let b = Value::new_array(vec![Value::Int(1), Value::Int(2)]);
        let c = Value::new_array(vec![Value::Int(2), Value::Int(1)]);
        assert!(values_equal(&a, &b));
        assert!(!values_equal(&a, &c));
    }

    #[test]
    fn map_equality_ignores_insertion_order() {
        let mut m1 = OrderedMap::new();
        m1.set("a".into(), Value::Int(1));
        m1.set("b".into(), Value::Int(2));
        let mut m2 = OrderedMap::new();
        m2.set("b".into(), Value::Int(2));
        m2.set("a".into(), Value::Int(1));
        assert!(values_equal(&Value::new_map(m1), &Value::new_map(m2)));
    }

    #[test]
    fn decimal_equality_is_value_based_not_string_based() {
        assert!(values_equal(
            &Value::Decimal("1.0".into()),
            &Value::Decimal("1".into())
        ));
    }

    #[test]
    fn deep_copy_array_is_independent() {
        let original = Value::new_array(vec![Value::Int(1)]);
        let copy = deep_copy_value(&original);
        if let (Value::Array(o), Value::Array(c)) = (&original, &copy) {
            c.borrow_mut().push(Value::Int(2));
            assert_eq!(o.borrow().len(), 1);
            assert_eq!(c.borrow().len(), 2);
        } else {
            panic!("expected arrays");
        }
    }

    #[test]
    fn type_matches_table() {
        assert!(type_matches(&TypeName::Int, &Value::Int(1)));
        assert!(!type_matches(&TypeName::Int, &Value::Float(1.0)));
        assert!(type_matches(&TypeName::Json, &Value::Bool(true)));
        assert!(type_matches(&TypeName::Function, &Value::Function(sample_function())));
        assert!(type_matches(&TypeName::Regex, &Value::Str("a.*b".into())));
    }

    #[test]
    fn ordered_map_keeps_key_list_in_sync() {
        let mut m = OrderedMap::new();
        m.set("a".into(), Value::Int(1));
        m.set("b".into(), Value::Int(2));
        m.delete("a");
        assert_eq!(m.keys(), &["b".to_string()]);
        assert!(!m.has("a"));
    }

    #[test]
    fn string_of_value_renders_ints_and_decimals() {
        assert_eq!(string_of_value(&Value::Int(5)), "5");
        assert_eq!(string_of_value(&Value::Decimal("0.3".into())), "0.3");
        assert_eq!(string_of_value(&Value::Bool(true)), "true");
    }
}
