//! SQLite-backed durable template store.
//!
//! # Responsibility
//! - Implement the sync adapter contract over the migrated template schema.
//! - Scope every read and write to the signed-in owner.
//!
//! # Invariants
//! - Child listing is deterministic: `display_order ASC, id ASC`.
//! - Deletes rely on `ON DELETE CASCADE` foreign keys.
//! - Signed-out sessions: sentence writes are skipped with `Ok`, every other
//!   write fails with `SyncError::NotAuthenticated`.

use crate::db::migrations::latest_version;
use crate::model::part::{Part, PartKind};
use crate::model::template::{
    CategoryId, CategoryRecord, OrderEntry, SectionId, SectionRecord, SentenceId, SentenceRecord,
    SubcategoryId, SubcategoryRecord,
};
use crate::sync::adapter::{
    CategoryRow, OwnerId, SectionRow, SentenceRow, SubcategoryRow, SyncAdapter, SyncError, SyncOp,
    SyncResult,
};
use log::{debug, info};
use rusqlite::{named_params, params, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const OWNED_CATEGORIES: &str = "SELECT id FROM categories WHERE owner_id = :owner";
const OWNED_SUBCATEGORIES: &str = "SELECT sub.id
    FROM subcategories sub
    INNER JOIN categories cat ON cat.id = sub.category_id
    WHERE cat.owner_id = :owner";
const OWNED_SECTIONS: &str = "SELECT sec.id
    FROM sections sec
    INNER JOIN subcategories sub ON sub.id = sec.subcategory_id
    INNER JOIN categories cat ON cat.id = sub.category_id
    WHERE cat.owner_id = :owner";
const OWNED_SENTENCES: &str = "SELECT sen.id
    FROM sentences sen
    INNER JOIN sections sec ON sec.id = sen.section_id
    INNER JOIN subcategories sub ON sub.id = sec.subcategory_id
    INNER JOIN categories cat ON cat.id = sub.category_id
    WHERE cat.owner_id = :owner";

const TOUCH_UPDATED_AT: &str = "updated_at = (strftime('%s', 'now') * 1000)";

/// Template store over a migrated SQLite connection.
pub struct SqliteSyncStore<'conn> {
    conn: &'conn Connection,
    owner_id: Option<OwnerId>,
}

impl<'conn> SqliteSyncStore<'conn> {
    /// Creates a signed-out store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> SyncResult<Self> {
        ensure_store_ready(conn)?;
        Ok(Self {
            conn,
            owner_id: None,
        })
    }

    /// Starts an owner session; later calls act on behalf of `owner_id`.
    pub fn sign_in(&mut self, owner_id: impl Into<OwnerId>) {
        let owner_id = owner_id.into();
        info!("event=store_session module=sqlite_store status=signed_in");
        self.owner_id = Some(owner_id);
    }

    pub fn sign_out(&mut self) {
        info!("event=store_session module=sqlite_store status=signed_out");
        self.owner_id = None;
    }

    pub fn owner_id(&self) -> Option<&str> {
        self.owner_id.as_deref()
    }

    fn require_owner(&self) -> SyncResult<&str> {
        self.owner_id()
            .ok_or(SyncError::NotAuthenticated)
    }

    fn begin(&self) -> SyncResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }

    fn owns(&self, subquery: &str, id: Uuid, owner: &str) -> SyncResult<bool> {
        let exists: i64 = self.conn.query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM ({subquery}) owned WHERE owned.id = :id);"),
            named_params! { ":id": id.to_string(), ":owner": owner },
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

impl SyncAdapter for SqliteSyncStore<'_> {
    fn load_tree(&self, owner_id: &str) -> SyncResult<Vec<CategoryRecord>> {
        if self.owner_id() != Some(owner_id) {
            info!("event=store_load module=sqlite_store status=skip reason=not_authenticated");
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, display_order
             FROM categories
             WHERE owner_id = ?1
             ORDER BY display_order ASC, id ASC;",
        )?;
        let mut rows = stmt.query([owner_id])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            let id = parse_uuid_column(row, "id", "categories.id")?;
            categories.push(CategoryRecord {
                id,
                title: row.get("title")?,
                description: row.get("description")?,
                display_order: row.get("display_order")?,
                subcategories: Vec::new(),
            });
        }
        for category in &mut categories {
            category.subcategories = load_subcategories(self.conn, category.id)?;
        }

        info!(
            "event=store_load module=sqlite_store status=ok categories={}",
            categories.len()
        );
        Ok(categories)
    }

    fn create_category(&self, row: &CategoryRow) -> SyncResult<()> {
        let owner = self.require_owner()?;
        self.conn.execute(
            "INSERT INTO categories (id, owner_id, title, description, display_order)
             VALUES (:id, :owner, :title, :description, :display_order);",
            named_params! {
                ":id": row.id.to_string(),
                ":owner": owner,
                ":title": row.title,
                ":description": row.description,
                ":display_order": row.display_order,
            },
        )?;
        log_write(SyncOp::CreateCategory, row.id);
        Ok(())
    }

    fn update_category(&self, row: &CategoryRow) -> SyncResult<()> {
        let owner = self.require_owner()?;
        let changed = self.conn.execute(
            &format!(
                "UPDATE categories
                 SET title = :title,
                     description = :description,
                     display_order = :display_order,
                     {TOUCH_UPDATED_AT}
                 WHERE id = :id
                   AND owner_id = :owner;"
            ),
            named_params! {
                ":id": row.id.to_string(),
                ":owner": owner,
                ":title": row.title,
                ":description": row.description,
                ":display_order": row.display_order,
            },
        )?;
        require_changed(changed, row.id)?;
        log_write(SyncOp::UpdateCategory, row.id);
        Ok(())
    }

    fn delete_category(&self, id: CategoryId) -> SyncResult<()> {
        let owner = self.require_owner()?;
        let changed = self.conn.execute(
            "DELETE FROM categories WHERE id = :id AND owner_id = :owner;",
            named_params! { ":id": id.to_string(), ":owner": owner },
        )?;
        require_changed(changed, id)?;
        log_write(SyncOp::DeleteCategory, id);
        Ok(())
    }

    fn reorder_categories(&self, order: &[OrderEntry]) -> SyncResult<()> {
        let owner = self.require_owner()?;
        let tx = self.begin()?;
        for entry in order {
            tx.execute(
                &format!(
                    "UPDATE categories
                     SET display_order = :display_order, {TOUCH_UPDATED_AT}
                     WHERE id = :id
                       AND owner_id = :owner;"
                ),
                named_params! {
                    ":id": entry.id.to_string(),
                    ":owner": owner,
                    ":display_order": entry.display_order,
                },
            )?;
        }
        tx.commit()?;
        debug!(
            "event=sync_write module=sqlite_store op={} status=ok count={}",
            SyncOp::ReorderCategories.as_str(),
            order.len()
        );
        Ok(())
    }

    fn create_subcategory(&self, row: &SubcategoryRow) -> SyncResult<()> {
        let owner = self.require_owner()?;
        if !self.owns(OWNED_CATEGORIES, row.category_id, owner)? {
            return Err(SyncError::NotFound(row.category_id));
        }
        self.conn.execute(
            "INSERT INTO subcategories (id, category_id, title, display_order)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                row.id.to_string(),
                row.category_id.to_string(),
                row.title,
                row.display_order,
            ],
        )?;
        log_write(SyncOp::CreateSubcategory, row.id);
        Ok(())
    }

    fn update_subcategory(&self, row: &SubcategoryRow) -> SyncResult<()> {
        let owner = self.require_owner()?;
        let changed = self.conn.execute(
            &format!(
                "UPDATE subcategories
                 SET title = :title, display_order = :display_order, {TOUCH_UPDATED_AT}
                 WHERE id = :id
                   AND category_id IN ({OWNED_CATEGORIES});"
            ),
            named_params! {
                ":id": row.id.to_string(),
                ":owner": owner,
                ":title": row.title,
                ":display_order": row.display_order,
            },
        )?;
        require_changed(changed, row.id)?;
        log_write(SyncOp::UpdateSubcategory, row.id);
        Ok(())
    }

    fn delete_subcategory(&self, id: SubcategoryId) -> SyncResult<()> {
        let owner = self.require_owner()?;
        let changed = self.conn.execute(
            &format!(
                "DELETE FROM subcategories
                 WHERE id = :id
                   AND category_id IN ({OWNED_CATEGORIES});"
            ),
            named_params! { ":id": id.to_string(), ":owner": owner },
        )?;
        require_changed(changed, id)?;
        log_write(SyncOp::DeleteSubcategory, id);
        Ok(())
    }

    fn reorder_subcategories(
        &self,
        category_id: CategoryId,
        order: &[OrderEntry],
    ) -> SyncResult<()> {
        let owner = self.require_owner()?;
        if !self.owns(OWNED_CATEGORIES, category_id, owner)? {
            return Err(SyncError::NotFound(category_id));
        }
        let tx = self.begin()?;
        for entry in order {
            tx.execute(
                &format!(
                    "UPDATE subcategories
                     SET display_order = ?2, {TOUCH_UPDATED_AT}
                     WHERE id = ?1
                       AND category_id = ?3;"
                ),
                params![
                    entry.id.to_string(),
                    entry.display_order,
                    category_id.to_string()
                ],
            )?;
        }
        tx.commit()?;
        log_write(SyncOp::ReorderSubcategories, category_id);
        Ok(())
    }

    fn create_section(&self, row: &SectionRow) -> SyncResult<()> {
        let owner = self.require_owner()?;
        if !self.owns(OWNED_SUBCATEGORIES, row.subcategory_id, owner)? {
            return Err(SyncError::NotFound(row.subcategory_id));
        }
        self.conn.execute(
            "INSERT INTO sections (id, subcategory_id, title, display_order)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                row.id.to_string(),
                row.subcategory_id.to_string(),
                row.title,
                row.display_order,
            ],
        )?;
        log_write(SyncOp::CreateSection, row.id);
        Ok(())
    }

    fn update_section(&self, row: &SectionRow) -> SyncResult<()> {
        let owner = self.require_owner()?;
        let changed = self.conn.execute(
            &format!(
                "UPDATE sections
                 SET title = :title, display_order = :display_order, {TOUCH_UPDATED_AT}
                 WHERE id = :id
                   AND subcategory_id IN ({OWNED_SUBCATEGORIES});"
            ),
            named_params! {
                ":id": row.id.to_string(),
                ":owner": owner,
                ":title": row.title,
                ":display_order": row.display_order,
            },
        )?;
        require_changed(changed, row.id)?;
        log_write(SyncOp::UpdateSection, row.id);
        Ok(())
    }

    fn delete_section(&self, id: SectionId) -> SyncResult<()> {
        let owner = self.require_owner()?;
        let changed = self.conn.execute(
            &format!(
                "DELETE FROM sections
                 WHERE id = :id
                   AND subcategory_id IN ({OWNED_SUBCATEGORIES});"
            ),
            named_params! { ":id": id.to_string(), ":owner": owner },
        )?;
        require_changed(changed, id)?;
        log_write(SyncOp::DeleteSection, id);
        Ok(())
    }

    fn reorder_sections(
        &self,
        subcategory_id: SubcategoryId,
        order: &[OrderEntry],
    ) -> SyncResult<()> {
        let owner = self.require_owner()?;
        if !self.owns(OWNED_SUBCATEGORIES, subcategory_id, owner)? {
            return Err(SyncError::NotFound(subcategory_id));
        }
        let tx = self.begin()?;
        for entry in order {
            tx.execute(
                &format!(
                    "UPDATE sections
                     SET display_order = ?2, {TOUCH_UPDATED_AT}
                     WHERE id = ?1
                       AND subcategory_id = ?3;"
                ),
                params![
                    entry.id.to_string(),
                    entry.display_order,
                    subcategory_id.to_string()
                ],
            )?;
        }
        tx.commit()?;
        log_write(SyncOp::ReorderSections, subcategory_id);
        Ok(())
    }

    fn create_sentence(&self, row: &SentenceRow) -> SyncResult<()> {
        let Some(owner) = self.owner_id() else {
            log_skip(SyncOp::CreateSentence);
            return Ok(());
        };
        if !self.owns(OWNED_SECTIONS, row.section_id, owner)? {
            return Err(SyncError::NotFound(row.section_id));
        }
        let tx = self.begin()?;
        tx.execute(
            "INSERT INTO sentences (id, section_id, display_order) VALUES (?1, ?2, ?3);",
            params![
                row.id.to_string(),
                row.section_id.to_string(),
                row.display_order
            ],
        )?;
        insert_parts(&tx, row.id, &row.parts)?;
        tx.commit()?;
        log_write(SyncOp::CreateSentence, row.id);
        Ok(())
    }

    fn update_sentence(&self, row: &SentenceRow) -> SyncResult<()> {
        let Some(owner) = self.owner_id() else {
            log_skip(SyncOp::UpdateSentence);
            return Ok(());
        };
        let tx = self.begin()?;
        let changed = tx.execute(
            &format!(
                "UPDATE sentences
                 SET display_order = :display_order, {TOUCH_UPDATED_AT}
                 WHERE id = :id
                   AND section_id IN ({OWNED_SECTIONS});"
            ),
            named_params! {
                ":id": row.id.to_string(),
                ":owner": owner,
                ":display_order": row.display_order,
            },
        )?;
        require_changed(changed, row.id)?;
        replace_parts(&tx, row.id, &row.parts)?;
        tx.commit()?;
        log_write(SyncOp::UpdateSentence, row.id);
        Ok(())
    }

    fn delete_sentence(&self, id: SentenceId) -> SyncResult<()> {
        let Some(owner) = self.owner_id() else {
            log_skip(SyncOp::DeleteSentence);
            return Ok(());
        };
        let changed = self.conn.execute(
            &format!(
                "DELETE FROM sentences
                 WHERE id = :id
                   AND section_id IN ({OWNED_SECTIONS});"
            ),
            named_params! { ":id": id.to_string(), ":owner": owner },
        )?;
        require_changed(changed, id)?;
        log_write(SyncOp::DeleteSentence, id);
        Ok(())
    }

    fn reorder_sentences(&self, section_id: SectionId, order: &[OrderEntry]) -> SyncResult<()> {
        let owner = self.require_owner()?;
        if !self.owns(OWNED_SECTIONS, section_id, owner)? {
            return Err(SyncError::NotFound(section_id));
        }
        let tx = self.begin()?;
        for entry in order {
            tx.execute(
                &format!(
                    "UPDATE sentences
                     SET display_order = ?2, {TOUCH_UPDATED_AT}
                     WHERE id = ?1
                       AND section_id = ?3;"
                ),
                params![
                    entry.id.to_string(),
                    entry.display_order,
                    section_id.to_string()
                ],
            )?;
        }
        tx.commit()?;
        log_write(SyncOp::ReorderSentences, section_id);
        Ok(())
    }

    fn save_full_structure(&self, tree: &[CategoryRecord]) -> SyncResult<()> {
        let owner = self.require_owner()?;
        let tx = self.begin()?;

        for (category_index, category) in tree.iter().enumerate() {
            tx.execute(
                &format!(
                    "INSERT INTO categories (id, owner_id, title, description, display_order)
                     VALUES (:id, :owner, :title, :description, :display_order)
                     ON CONFLICT(id) DO UPDATE SET
                        title = excluded.title,
                        description = excluded.description,
                        display_order = excluded.display_order,
                        {TOUCH_UPDATED_AT}
                     WHERE categories.owner_id = excluded.owner_id;"
                ),
                named_params! {
                    ":id": category.id.to_string(),
                    ":owner": owner,
                    ":title": category.title,
                    ":description": category.description,
                    ":display_order": category_index as i64,
                },
            )?;
            let owned: i64 = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1 AND owner_id = ?2);",
                params![category.id.to_string(), owner],
                |row| row.get(0),
            )?;
            if owned != 1 {
                return Err(SyncError::NotFound(category.id));
            }

            for (subcategory_index, subcategory) in category.subcategories.iter().enumerate() {
                upsert_subcategory(&tx, category.id, subcategory, subcategory_index)?;
            }
        }

        tx.commit()?;
        info!(
            "event=sync_write module=sqlite_store op={} status=ok categories={}",
            SyncOp::SaveFullStructure.as_str(),
            tree.len()
        );
        Ok(())
    }
}

fn upsert_subcategory(
    conn: &Connection,
    category_id: CategoryId,
    subcategory: &SubcategoryRecord,
    index: usize,
) -> SyncResult<()> {
    conn.execute(
        &format!(
            "INSERT INTO subcategories (id, category_id, title, display_order)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                display_order = excluded.display_order,
                {TOUCH_UPDATED_AT}
             WHERE subcategories.category_id = excluded.category_id;"
        ),
        params![
            subcategory.id.to_string(),
            category_id.to_string(),
            subcategory.title,
            index as i64,
        ],
    )?;
    require_parent(conn, ChildTable::Subcategories, subcategory.id, category_id)?;

    for (section_index, section) in subcategory.sections.iter().enumerate() {
        conn.execute(
            &format!(
                "INSERT INTO sections (id, subcategory_id, title, display_order)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET
                    title = excluded.title,
                    display_order = excluded.display_order,
                    {TOUCH_UPDATED_AT}
                 WHERE sections.subcategory_id = excluded.subcategory_id;"
            ),
            params![
                section.id.to_string(),
                subcategory.id.to_string(),
                section.title,
                section_index as i64,
            ],
        )?;
        require_parent(conn, ChildTable::Sections, section.id, subcategory.id)?;

        for (sentence_index, sentence) in section.sentences.iter().enumerate() {
            conn.execute(
                &format!(
                    "INSERT INTO sentences (id, section_id, display_order)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT(id) DO UPDATE SET
                        display_order = excluded.display_order,
                        {TOUCH_UPDATED_AT}
                     WHERE sentences.section_id = excluded.section_id;"
                ),
                params![
                    sentence.id.to_string(),
                    section.id.to_string(),
                    sentence_index as i64,
                ],
            )?;
            require_parent(conn, ChildTable::Sentences, sentence.id, section.id)?;
            replace_parts(conn, sentence.id, &sentence.parts)?;
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum ChildTable {
    Subcategories,
    Sections,
    Sentences,
}

impl ChildTable {
    fn lookup_sql(self) -> &'static str {
        match self {
            Self::Subcategories => {
                "SELECT EXISTS(SELECT 1 FROM subcategories WHERE id = ?1 AND category_id = ?2);"
            }
            Self::Sections => {
                "SELECT EXISTS(SELECT 1 FROM sections WHERE id = ?1 AND subcategory_id = ?2);"
            }
            Self::Sentences => {
                "SELECT EXISTS(SELECT 1 FROM sentences WHERE id = ?1 AND section_id = ?2);"
            }
        }
    }
}

/// Fails with `NotFound` when `id` lives under another parent, which means
/// the upsert above left a foreign row untouched.
fn require_parent(
    conn: &Connection,
    table: ChildTable,
    id: Uuid,
    parent_id: Uuid,
) -> SyncResult<()> {
    let attached: i64 = conn.query_row(
        table.lookup_sql(),
        params![id.to_string(), parent_id.to_string()],
        |row| row.get(0),
    )?;
    if attached != 1 {
        return Err(SyncError::NotFound(id));
    }
    Ok(())
}

fn load_subcategories(
    conn: &Connection,
    category_id: CategoryId,
) -> SyncResult<Vec<SubcategoryRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, display_order
         FROM subcategories
         WHERE category_id = ?1
         ORDER BY display_order ASC, id ASC;",
    )?;
    let mut rows = stmt.query([category_id.to_string()])?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(SubcategoryRecord {
            id: parse_uuid_column(row, "id", "subcategories.id")?,
            title: row.get("title")?,
            display_order: row.get("display_order")?,
            sections: Vec::new(),
        });
    }
    for item in &mut items {
        item.sections = load_sections(conn, item.id)?;
    }
    Ok(items)
}

fn load_sections(
    conn: &Connection,
    subcategory_id: SubcategoryId,
) -> SyncResult<Vec<SectionRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, display_order
         FROM sections
         WHERE subcategory_id = ?1
         ORDER BY display_order ASC, id ASC;",
    )?;
    let mut rows = stmt.query([subcategory_id.to_string()])?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(SectionRecord {
            id: parse_uuid_column(row, "id", "sections.id")?,
            title: row.get("title")?,
            display_order: row.get("display_order")?,
            sentences: Vec::new(),
        });
    }
    for item in &mut items {
        item.sentences = load_sentences(conn, item.id)?;
    }
    Ok(items)
}

fn load_sentences(conn: &Connection, section_id: SectionId) -> SyncResult<Vec<SentenceRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, display_order
         FROM sentences
         WHERE section_id = ?1
         ORDER BY display_order ASC, id ASC;",
    )?;
    let mut rows = stmt.query([section_id.to_string()])?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(SentenceRecord {
            id: parse_uuid_column(row, "id", "sentences.id")?,
            display_order: row.get("display_order")?,
            parts: Vec::new(),
        });
    }
    for item in &mut items {
        item.parts = load_parts(conn, item.id)?;
    }
    Ok(items)
}

fn load_parts(conn: &Connection, sentence_id: SentenceId) -> SyncResult<Vec<Part>> {
    let mut stmt = conn.prepare(
        "SELECT part_type, part_value, part_label, part_width, part_input_type
         FROM sentence_parts
         WHERE sentence_id = ?1
         ORDER BY part_order ASC;",
    )?;
    let mut rows = stmt.query([sentence_id.to_string()])?;
    let mut parts = Vec::new();
    while let Some(row) = rows.next()? {
        parts.push(parse_part_row(row)?);
    }
    Ok(parts)
}

fn replace_parts(conn: &Connection, sentence_id: SentenceId, parts: &[Part]) -> SyncResult<()> {
    conn.execute(
        "DELETE FROM sentence_parts WHERE sentence_id = ?1;",
        [sentence_id.to_string()],
    )?;
    insert_parts(conn, sentence_id, parts)
}

fn insert_parts(conn: &Connection, sentence_id: SentenceId, parts: &[Part]) -> SyncResult<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO sentence_parts (
            sentence_id,
            part_order,
            part_type,
            part_value,
            part_label,
            part_width,
            part_input_type
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
    )?;
    for (index, part) in parts.iter().enumerate() {
        let columns = PartColumns::from_part(part);
        stmt.execute(params![
            sentence_id.to_string(),
            index as i64,
            columns.kind.as_str(),
            columns.value,
            columns.label,
            columns.width,
            columns.input_hint,
        ])?;
    }
    Ok(())
}

/// Column projection of one part row.
struct PartColumns<'a> {
    kind: PartKind,
    value: &'a str,
    label: Option<&'a str>,
    width: Option<&'a str>,
    input_hint: Option<&'a str>,
}

impl<'a> PartColumns<'a> {
    fn from_part(part: &'a Part) -> Self {
        match part {
            Part::Literal { value } => Self {
                kind: PartKind::Literal,
                value,
                label: None,
                width: None,
                input_hint: None,
            },
            Part::FreeText {
                label,
                width,
                input_hint,
            } => Self {
                kind: PartKind::FreeText,
                value: "",
                label: label.as_deref(),
                width: width.as_deref(),
                input_hint: input_hint.as_deref(),
            },
            Part::Choice { label, options } => Self {
                kind: PartKind::Choice,
                value: options,
                label: label.as_deref(),
                width: None,
                input_hint: None,
            },
        }
    }
}

fn parse_part_row(row: &Row<'_>) -> SyncResult<Part> {
    let kind_text: String = row.get("part_type")?;
    let kind = PartKind::parse(&kind_text).ok_or_else(|| {
        SyncError::InvalidData(format!(
            "invalid part type `{kind_text}` in sentence_parts.part_type"
        ))
    })?;
    let value: String = row.get("part_value")?;
    let label: Option<String> = row.get("part_label")?;

    Ok(match kind {
        PartKind::Literal => Part::Literal { value },
        PartKind::FreeText => Part::FreeText {
            label,
            width: row.get("part_width")?,
            input_hint: row.get("part_input_type")?,
        },
        PartKind::Choice => Part::Choice {
            label,
            options: value,
        },
    })
}

fn parse_uuid_column(row: &Row<'_>, name: &str, column: &'static str) -> SyncResult<Uuid> {
    let value: String = row.get(name)?;
    Uuid::parse_str(&value)
        .map_err(|_| SyncError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

fn require_changed(changed: usize, id: Uuid) -> SyncResult<()> {
    if changed == 0 {
        return Err(SyncError::NotFound(id));
    }
    Ok(())
}

fn log_write(op: SyncOp, id: Uuid) {
    debug!(
        "event=sync_write module=sqlite_store op={} status=ok id={id}",
        op.as_str()
    );
}

fn log_skip(op: SyncOp) {
    info!(
        "event=sync_write module=sqlite_store op={} status=skip reason=not_authenticated",
        op.as_str()
    );
}

fn ensure_store_ready(conn: &Connection) -> SyncResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(SyncError::Unavailable(format!(
            "template store requires schema version {expected_version}, got {actual_version}"
        )));
    }

    for table in [
        "categories",
        "subcategories",
        "sections",
        "sentences",
        "sentence_parts",
    ] {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(SyncError::Unavailable(format!(
                "template store requires table `{table}`"
            )));
        }
    }
    Ok(())
}
