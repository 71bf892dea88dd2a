use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A value that can be stored in [`Data`].
///
/// Implemented for every `Serialize + Debug` type, so callers never
/// implement it by hand. Strings are recognized so the unrolled renderer can
/// write them without going through `serde_json`.
pub trait DataValue: fmt::Debug + Send + Sync {
    /// Convert to a JSON value. Fails for values `serde_json` can not
    /// represent, e.g. maps with non-string keys.
    fn to_json(&self) -> serde_json::Result<serde_json::Value>;

    /// Encode as compact JSON directly into `out`.
    fn write_json(&self, out: &mut Vec<u8>) -> serde_json::Result<()>;

    /// The value as a string slice, when it is one.
    fn as_str(&self) -> Option<&str>;
}

impl<T> DataValue for T
where
    T: Serialize + fmt::Debug + Send + Sync + 'static,
{
    fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    fn write_json(&self, out: &mut Vec<u8>) -> serde_json::Result<()> {
        serde_json::to_writer(out, self)
    }

    fn as_str(&self) -> Option<&str> {
        let any = self as &dyn Any;
        if let Some(s) = any.downcast_ref::<String>() {
            return Some(s.as_str());
        }
        any.downcast_ref::<&'static str>().copied()
    }
}

/// Arbitrary key/value pairs attached to an event.
///
/// Use this only where no dedicated attachment exists, since values in
/// `data` aren't easily indexable. Values can be nested `Data`.
///
/// Keys are kept sorted, so both renderers emit them in the same order.
#[derive(Clone, Default)]
pub struct Data(BTreeMap<String, Arc<dyn DataValue>>);

impl Data {
    pub fn new() -> Self {
        Data(BTreeMap::new())
    }

    /// Builder form of [`Data::insert`].
    pub fn with<V: DataValue + 'static>(mut self, key: impl Into<String>, value: V) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert<V: DataValue + 'static>(&mut self, key: impl Into<String>, value: V) {
        self.0.insert(key.into(), Arc::new(value));
    }

    pub fn get(&self, key: &str) -> Option<&dyn DataValue> {
        self.0.get(key).map(|v| &**v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn DataValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), &**v))
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

/// Two maps are equal when they hold the same keys and every value encodes
/// to the same JSON.
impl PartialEq for Data {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self.0.iter().zip(other.0.iter()).all(|((ka, va), (kb, vb))| {
                ka == kb
                    && match (va.to_json(), vb.to_json()) {
                        (Ok(a), Ok(b)) => a == b,
                        _ => false,
                    }
            })
    }
}

impl Serialize for Data {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            let value = value.to_json().map_err(S::Error::custom)?;
            map.serialize_entry(key, &value)?;
        }
        map.end()
    }
}

/// Build a [`Data`] from `key => value` pairs.
///
/// ```
/// use event_log::data;
///
/// let data = data! { "destination" => "http://localhost:8080", "attempt" => 2 };
/// assert_eq!(data.len(), 2);
/// ```
#[macro_export]
macro_rules! data {
    () => ($crate::Data::new());
    ( $($key:expr => $value:expr),+ $(,)? ) => ({
        let mut _data = $crate::Data::new();
        $(
            _data.insert($key, $value);
        )+
        _data
    });
}
