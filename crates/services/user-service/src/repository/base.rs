//! Generic CRUD repository over a SeaORM entity.
//!
//! `BaseRepository` is parameterized over the entity, its active model and
//! the create/update schemas accepted by `create`/`update`. It holds no
//! connection: every operation runs against the connection or transaction
//! the caller passes in.

use std::fmt;
use std::marker::PhantomData;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityName, EntityTrait, IdenStatic, IntoActiveModel, Iterable, PaginatorTrait,
    PrimaryKeyToColumn, PrimaryKeyTrait, QueryFilter, QueryOrder, QuerySelect, Select, Value,
};

use common::{AppError, AppResult};

/// Primary key value type of an entity.
pub type PrimaryKeyOf<E> = <<E as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// A set of field assignments applied to an active model.
///
/// Fields the change set does not carry stay untouched, which is what makes
/// `update` partial.
pub trait Changes<A>: Send
where
    A: ActiveModelTrait,
{
    fn apply_to(self, model: &mut A);
}

/// An active model used as a patch: every `Set` field is copied over.
impl<A> Changes<A> for A
where
    A: ActiveModelTrait + Send,
{
    fn apply_to(self, model: &mut A) {
        for column in <A::Entity as EntityTrait>::Column::iter() {
            if let ActiveValue::Set(value) = self.get(column) {
                model.set(column, value);
            }
        }
    }
}

/// CRUD operations shared by every entity.
///
/// * `E` - SeaORM entity
/// * `A` - active model of `E`
/// * `C` - create schema, converted into `A` on insert
/// * `U` - update schema, applied onto the stored row
pub struct BaseRepository<E, A, C, U> {
    _marker: PhantomData<fn() -> (E, A, C, U)>,
}

impl<E, A, C, U> BaseRepository<E, A, C, U> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<E, A, C, U> Default for BaseRepository<E, A, C, U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, A, C, U> Clone for BaseRepository<E, A, C, U> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<E: EntityTrait, A, C, U> fmt::Debug for BaseRepository<E, A, C, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseRepository")
            .field("table", &E::default().table_name())
            .finish()
    }
}

impl<E, A, C, U> BaseRepository<E, A, C, U>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<A> + Send + Sync + 'static,
    A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
    C: IntoActiveModel<A> + Send,
    U: Changes<A>,
{
    /// Row with the given primary key, if any.
    pub async fn get<Db>(&self, db: &Db, id: PrimaryKeyOf<E>) -> AppResult<Option<E::Model>>
    where
        Db: ConnectionTrait,
    {
        Ok(E::find_by_id(id).one(db).await?)
    }

    /// One page of rows in primary key order.
    pub async fn get_multi<Db>(&self, db: &Db, skip: u64, limit: u64) -> AppResult<Vec<E::Model>>
    where
        Db: ConnectionTrait,
    {
        Ok(Self::ordered(E::find())
            .offset(skip)
            .limit(limit)
            .all(db)
            .await?)
    }

    /// Insert a row built from the create schema.
    pub async fn create<Db>(&self, db: &Db, payload: C) -> AppResult<E::Model>
    where
        Db: ConnectionTrait,
    {
        self.create_from(db, payload).await
    }

    /// Insert a row from anything convertible into the active model,
    /// including a hand-built active model.
    pub async fn create_from<Db, P>(&self, db: &Db, payload: P) -> AppResult<E::Model>
    where
        Db: ConnectionTrait,
        P: IntoActiveModel<A>,
    {
        payload
            .into_active_model()
            .insert(db)
            .await
            .map_err(Self::write_error)
    }

    /// Apply the fields present in `payload` to `existing` and persist them.
    pub async fn update<Db>(&self, db: &Db, existing: E::Model, payload: U) -> AppResult<E::Model>
    where
        Db: ConnectionTrait,
    {
        self.update_with(db, existing, payload).await
    }

    /// Like [`update`](Self::update) for any change set, including an active
    /// model patch.
    pub async fn update_with<Db, P>(
        &self,
        db: &Db,
        existing: E::Model,
        changes: P,
    ) -> AppResult<E::Model>
    where
        Db: ConnectionTrait,
        P: Changes<A>,
    {
        let mut active = existing.into_active_model();
        changes.apply_to(&mut active);

        active.update(db).await.map_err(Self::write_error)
    }

    /// Delete by primary key, returning the removed row.
    pub async fn remove<Db>(&self, db: &Db, id: PrimaryKeyOf<E>) -> AppResult<Option<E::Model>>
    where
        Db: ConnectionTrait,
    {
        let Some(model) = E::find_by_id(id).one(db).await? else {
            return Ok(None);
        };

        model.clone().into_active_model().delete(db).await?;
        Ok(Some(model))
    }

    /// First row (by primary key) whose `column` equals `value`.
    pub async fn get_by_attribute<Db, V>(
        &self,
        db: &Db,
        column: E::Column,
        value: V,
    ) -> AppResult<Option<E::Model>>
    where
        Db: ConnectionTrait,
        V: Into<Value>,
    {
        Ok(Self::ordered(E::find().filter(column.eq(value)))
            .one(db)
            .await?)
    }

    /// One page of rows whose `column` equals `value`.
    pub async fn get_multi_by_attribute<Db, V>(
        &self,
        db: &Db,
        column: E::Column,
        value: V,
        skip: u64,
        limit: u64,
    ) -> AppResult<Vec<E::Model>>
    where
        Db: ConnectionTrait,
        V: Into<Value>,
    {
        Ok(Self::ordered(E::find().filter(column.eq(value)))
            .offset(skip)
            .limit(limit)
            .all(db)
            .await?)
    }

    /// Total number of rows.
    pub async fn count<Db>(&self, db: &Db) -> AppResult<u64>
    where
        Db: ConnectionTrait,
    {
        Ok(E::find().count(db).await?)
    }

    /// Resolve an attribute name to its column.
    ///
    /// # Errors
    /// `BadRequest` when the entity has no such column.
    pub fn column(&self, name: &str) -> AppResult<E::Column> {
        E::Column::iter()
            .find(|column| column.as_str() == name)
            .ok_or_else(|| {
                AppError::bad_request(format!(
                    "unknown attribute `{}` on {}",
                    name,
                    E::default().table_name()
                ))
            })
    }

    fn ordered(select: Select<E>) -> Select<E> {
        E::PrimaryKey::iter().fold(select, |query, key| query.order_by_asc(key.into_column()))
    }

    fn write_error(err: DbErr) -> AppError {
        AppError::from_write(err, E::default().table_name())
    }
}
