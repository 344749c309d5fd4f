//! Reduces serialized entities to a client-selected subset of their fields.
//!
//! The properties of `T` are the keys `T` serializes to, so renames applied
//! through serde attributes are what clients ask for. Matching is
//! case-insensitive, unknown names are skipped and the output keeps the order
//! in which the fields were requested.

use std::marker::PhantomData;

use serde::Serialize;
use serde_json::{Map, Value};

pub type ShapedEntity = Map<String, Value>;

#[derive(Debug)]
pub struct DataShaper<T> {
    _entity: PhantomData<fn(&T)>,
}

impl<T> Default for DataShaper<T> {
    fn default() -> Self {
        Self {
            _entity: PhantomData,
        }
    }
}

impl<T: Serialize> DataShaper<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shape_data(&self, entity: &T, fields: Option<&str>) -> serde_json::Result<ShapedEntity> {
        let requested = requested_fields(fields);
        shape_entity(entity, requested.as_deref())
    }

    pub fn shape_collection(
        &self,
        entities: &[T],
        fields: Option<&str>,
    ) -> serde_json::Result<Vec<ShapedEntity>> {
        let requested = requested_fields(fields);
        entities
            .iter()
            .map(|entity| shape_entity(entity, requested.as_deref()))
            .collect()
    }
}

// None means every property
fn requested_fields(fields: Option<&str>) -> Option<Vec<String>> {
    let fields = fields.filter(|f| !f.trim().is_empty())?;
    Some(
        fields
            .split(',')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .map(str::to_owned)
            .collect(),
    )
}

fn shape_entity<T: Serialize>(entity: &T, requested: Option<&[String]>) -> serde_json::Result<ShapedEntity> {
    let properties = match serde_json::to_value(entity)? {
        Value::Object(map) => map,
        other => {
            return Err(<serde_json::Error as serde::ser::Error>::custom(format!(
                "only structs can be shaped, got {}",
                other
            )))
        }
    };

    let Some(requested) = requested else {
        return Ok(properties);
    };

    let mut shaped = ShapedEntity::new();
    for field in requested {
        let property = properties
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(field));
        if let Some((name, value)) = property {
            if !shaped.contains_key(name) {
                shaped.insert(name.clone(), value.clone());
            }
        }
    }
    Ok(shaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Person {
        id: u32,
        full_name: String,
        age: i32,
    }

    fn people() -> Vec<Person> {
        vec![
            Person { id: 1, full_name: "Sam Raiden".into(), age: 26 },
            Person { id: 2, full_name: "Jana McLeaf".into(), age: 30 },
        ]
    }

    fn keys(entity: &ShapedEntity) -> Vec<&str> {
        entity.keys().map(String::as_str).collect()
    }

    #[test]
    fn no_fields_returns_every_property_in_declaration_order() {
        let shaper = DataShaper::<Person>::new();
        for fields in [None, Some(""), Some("   ")] {
            let shaped = shaper.shape_data(&people()[0], fields).unwrap();
            assert_eq!(keys(&shaped), ["id", "fullName", "age"]);
        }
    }

    #[test]
    fn fields_are_matched_case_insensitively_in_request_order() {
        let shaper = DataShaper::<Person>::new();
        let shaped = shaper.shape_data(&people()[0], Some(" AGE ,fullname")).unwrap();
        assert_eq!(keys(&shaped), ["age", "fullName"]);
        assert_eq!(shaped["fullName"], "Sam Raiden");
        assert_eq!(shaped["age"], 26);
    }

    #[test]
    fn unknown_empty_and_duplicate_fields_are_skipped() {
        let shaper = DataShaper::<Person>::new();
        let shaped = shaper
            .shape_data(&people()[1], Some("salary,,id,ID"))
            .unwrap();
        assert_eq!(keys(&shaped), ["id"]);
    }

    #[test]
    fn only_unknown_fields_yield_empty_objects() {
        let shaper = DataShaper::<Person>::new();
        let shaped = shaper.shape_collection(&people(), Some("salary")).unwrap();
        assert_eq!(shaped.len(), 2);
        assert!(shaped.iter().all(|entity| entity.is_empty()));
    }

    #[test]
    fn collections_are_shaped_per_entity() {
        let shaper = DataShaper::<Person>::new();
        let shaped = shaper.shape_collection(&people(), Some("fullName")).unwrap();
        let names: Vec<_> = shaped.iter().map(|e| e["fullName"].clone()).collect();
        assert_eq!(names, ["Sam Raiden", "Jana McLeaf"]);
    }

    #[test]
    fn non_struct_values_are_rejected() {
        let shaper = DataShaper::<u32>::new();
        assert!(shaper.shape_data(&7, None).is_err());
    }
}
