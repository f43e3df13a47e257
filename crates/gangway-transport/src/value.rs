//! Tri-state attribute values
//!
//! Every transport attribute is `Known`, explicitly `Null`, or `Unknown`
//! (pending a remote computation). The three states are a tagged enum, so an
//! attribute can never be in two states at once, and equality compares state
//! before value.

use crate::error::{Result, TransportError};
use crate::wire::WireValue;

/// A scalar or list attribute with exactly one of three states.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TriState<T> {
    Known(T),
    /// Explicitly absent or cleared.
    #[default]
    Null,
    /// Will be determined after a remote operation.
    Unknown,
}

impl<T> TriState<T> {
    /// The value, if the state is `Known`. Null and Unknown both read as
    /// "no value".
    pub fn get(&self) -> Option<&T> {
        match self {
            TriState::Known(value) => Some(value),
            _ => None,
        }
    }

    /// Transition to `Known`, replacing any prior state.
    pub fn set(&mut self, value: T) {
        *self = TriState::Known(value);
    }

    pub fn is_known(&self) -> bool {
        matches!(self, TriState::Known(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TriState::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, TriState::Unknown)
    }
}

impl<T: Clone> TriState<T> {
    /// Fill this attribute from a defaults source: a Known default is copied
    /// in only when this value is Null or Unknown. A Known value is never
    /// overwritten, so the more specific configuration always wins.
    pub fn merge_default(&mut self, src: &TriState<T>) {
        if !self.is_known() {
            if let TriState::Known(value) = src {
                *self = TriState::Known(value.clone());
            }
        }
    }

    /// Owned copy of the value, if Known.
    pub fn cloned(&self) -> Option<T> {
        self.get().cloned()
    }
}

impl<T> From<T> for TriState<T> {
    fn from(value: T) -> Self {
        TriState::Known(value)
    }
}

impl<T: AttrCodec> TriState<T> {
    /// Decode from a wire value, fully replacing prior state. `path` names
    /// the attribute in decode errors.
    pub fn from_wire(path: &str, wire: &WireValue) -> Result<Self> {
        match wire {
            WireValue::Unknown => Ok(TriState::Unknown),
            WireValue::Null => Ok(TriState::Null),
            known => T::decode(path, known).map(TriState::Known),
        }
    }

    /// Encode back to the wire representation; round-trips bit-exactly for
    /// all three states.
    pub fn to_wire(&self) -> WireValue {
        match self {
            TriState::Known(value) => value.encode(),
            TriState::Null => WireValue::Null,
            TriState::Unknown => WireValue::Unknown,
        }
    }
}

/// Typed decode/encode between an attribute's value type and its known wire
/// shape. Null and Unknown are handled by [`TriState`]; implementations only
/// see known values.
pub trait AttrCodec: Sized {
    fn decode(path: &str, wire: &WireValue) -> Result<Self>;
    fn encode(&self) -> WireValue;
}

impl AttrCodec for String {
    fn decode(path: &str, wire: &WireValue) -> Result<Self> {
        match wire {
            WireValue::String(s) => Ok(s.clone()),
            other => Err(TransportError::decode(
                path,
                format!("expected string, got {}", other.type_name()),
            )),
        }
    }

    fn encode(&self) -> WireValue {
        WireValue::String(self.clone())
    }
}

impl AttrCodec for bool {
    fn decode(path: &str, wire: &WireValue) -> Result<Self> {
        match wire {
            WireValue::Bool(b) => Ok(*b),
            other => Err(TransportError::decode(
                path,
                format!("expected bool, got {}", other.type_name()),
            )),
        }
    }

    fn encode(&self) -> WireValue {
        WireValue::Bool(*self)
    }
}

impl AttrCodec for f64 {
    fn decode(path: &str, wire: &WireValue) -> Result<Self> {
        match wire {
            WireValue::Number(n) => Ok(*n),
            other => Err(TransportError::decode(
                path,
                format!("expected number, got {}", other.type_name()),
            )),
        }
    }

    fn encode(&self) -> WireValue {
        WireValue::Number(*self)
    }
}

impl AttrCodec for Vec<String> {
    /// Elements must be known strings; the host protocol marks whole
    /// attributes unknown, never single elements.
    fn decode(path: &str, wire: &WireValue) -> Result<Self> {
        match wire {
            WireValue::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    match item {
                        WireValue::String(s) => out.push(s.clone()),
                        other => {
                            return Err(TransportError::decode(
                                format!("{path}[{i}]"),
                                format!("expected string element, got {}", other.type_name()),
                            ));
                        }
                    }
                }
                Ok(out)
            }
            other => Err(TransportError::decode(
                path,
                format!("expected list of strings, got {}", other.type_name()),
            )),
        }
    }

    fn encode(&self) -> WireValue {
        WireValue::List(self.iter().cloned().map(WireValue::String).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_only_for_known() {
        assert_eq!(TriState::Known("x".to_string()).get(), Some(&"x".to_string()));
        assert_eq!(TriState::<String>::Null.get(), None);
        assert_eq!(TriState::<String>::Unknown.get(), None);
    }

    #[test]
    fn test_set_replaces_any_state() {
        let mut value = TriState::<String>::Unknown;
        value.set("now".to_string());
        assert_eq!(value, TriState::Known("now".to_string()));
    }

    #[test]
    fn test_decode_replaces_prior_known_with_null() {
        // A null wire value over a previously-set attribute must decode to
        // Null, never retain the old value.
        let mut value = TriState::Known("old".to_string());
        value = TriState::from_wire("ssh.user", &WireValue::Null).unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn test_round_trip_all_states() {
        for state in [
            TriState::Known("v".to_string()),
            TriState::Null,
            TriState::Unknown,
        ] {
            let wire = state.to_wire();
            assert_eq!(TriState::<String>::from_wire("attr", &wire).unwrap(), state);
        }
    }

    #[test]
    fn test_bool_and_number_round_trip() {
        let flag = TriState::Known(true);
        assert_eq!(TriState::<bool>::from_wire("flag", &flag.to_wire()).unwrap(), flag);

        let count = TriState::Known(3.0);
        assert_eq!(TriState::<f64>::from_wire("count", &count.to_wire()).unwrap(), count);
    }

    #[test]
    fn test_decode_wrong_shape_names_path() {
        let err = TriState::<String>::from_wire("nomad.host", &WireValue::Bool(true)).unwrap_err();
        assert!(err.to_string().contains("nomad.host"));
        assert!(err.to_string().contains("expected string"));
    }

    #[test]
    fn test_merge_default_fills_only_absent() {
        let mut set = TriState::Known("mine".to_string());
        set.merge_default(&TriState::Known("theirs".to_string()));
        assert_eq!(set.get().unwrap(), "mine");

        let mut null = TriState::<String>::Null;
        null.merge_default(&TriState::Known("theirs".to_string()));
        assert_eq!(null.get().unwrap(), "theirs");

        let mut unknown = TriState::<String>::Unknown;
        unknown.merge_default(&TriState::Known("theirs".to_string()));
        assert_eq!(unknown.get().unwrap(), "theirs");

        // A non-known default never changes the destination state.
        let mut stays_null = TriState::<String>::Null;
        stays_null.merge_default(&TriState::Unknown);
        assert!(stays_null.is_null());
    }

    #[test]
    fn test_equality_compares_state_first() {
        assert_ne!(TriState::<String>::Null, TriState::<String>::Unknown);
        assert_ne!(TriState::Known(String::new()), TriState::Null);
    }

    #[test]
    fn test_string_list_round_trip() {
        let value = TriState::Known(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(
            TriState::<Vec<String>>::from_wire("env", &value.to_wire()).unwrap(),
            value
        );
    }

    #[test]
    fn test_string_list_rejects_mixed_elements() {
        let wire = WireValue::List(vec![WireValue::String("a".to_string()), WireValue::Null]);
        let err = TriState::<Vec<String>>::from_wire("env", &wire).unwrap_err();
        assert!(err.to_string().contains("env[1]"));
    }
}
