use crate::error::Error;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, Value,
};
use std::collections::HashMap;

/// Updates an existing record using a map of column names to values, touching
/// only the columns present in the map. This is what backs partial (PATCH)
/// updates: absent fields keep their stored value.
pub async fn update<A, C>(
    db: &DatabaseConnection,
    mut active_model: A,
    update_map: UpdateMap,
) -> Result<<A::Entity as EntityTrait>::Model, Error>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    C: ColumnTrait,
    A::Entity: EntityTrait<Column = C>,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    // Iterate the entity's own columns so we only ever set columns that exist.
    for column in C::iter() {
        if let Some(value) = update_map.get(&column.to_string()) {
            active_model.set(column, value.clone());
        }
    }
    Ok(active_model.update(db).await?)
}

/// A map of column names to new values for an update statement.
/// A key mapped to `None` is treated the same as an absent key.
#[derive(Default)]
pub struct UpdateMap {
    map: HashMap<String, Option<Value>>,
}

impl UpdateMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key).and_then(|opt| opt.as_ref())
    }

    pub fn insert(&mut self, key: String, value: Option<Value>) {
        self.map.insert(key, value);
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Conversion into an [`UpdateMap`], implemented by typed endpoint parameter
/// structs in the web layer.
pub trait IntoUpdateMap {
    fn into_update_map(self) -> UpdateMap;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_values_are_treated_as_absent() {
        let mut map = UpdateMap::new();
        map.insert("title".to_string(), None);

        assert!(map.get("title").is_none());
    }

    #[test]
    fn present_values_are_returned() {
        let mut map = UpdateMap::new();
        map.insert(
            "title".to_string(),
            Some(Value::String(Some(Box::new("Dune".to_string())))),
        );

        assert!(map.get("title").is_some());
        assert!(map.get("author").is_none());
    }
}
