//! 内存结果集

use crate::api::core::{ResultSet, ResultSetMetaData, Statement, Wrapper};
use crate::core::{
    Column, Concurrency, FetchDirection, Holdability, ResultSetType, SqlError, SqlResult,
    SqlType, StatementOptions, TypeKey, Value, Warning,
};
use crate::mock::metadata::MockResultSetMetaData;
use crate::mock::statement::MockStatement;
use crate::mock::{args, convert, MockRows, MockShared};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::{Arc, Weak};

#[derive(Debug)]
struct ResultSetState {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    /// 0 表示第一行之前，`rows.len() + 1` 表示最后一行之后
    cursor: usize,
    closed: bool,
    was_null: bool,
    warnings: Vec<Warning>,
    fetch_direction: FetchDirection,
    fetch_size: usize,
    pending: HashMap<usize, Value>,
    insert_buffer: Option<Vec<Value>>,
    updated: bool,
    inserted: bool,
    deleted: bool,
}

impl ResultSetState {
    fn on_row(&self) -> bool {
        self.cursor >= 1 && self.cursor <= self.rows.len()
    }

    fn resolve(&self, column: Column<'_>) -> SqlResult<usize> {
        match column {
            Column::Index(i) if i >= 1 && i <= self.columns.len() => Ok(i),
            Column::Index(i) => Err(SqlError::InvalidArgument(format!("列序号越界: {}", i))),
            Column::Label(label) => self
                .columns
                .iter()
                .position(|c| c.eq_ignore_ascii_case(label))
                .map(|p| p + 1)
                .ok_or_else(|| SqlError::InvalidArgument(format!("列不存在: {}", label))),
        }
    }

    fn move_to(&mut self, cursor: usize) -> bool {
        self.cursor = cursor.min(self.rows.len() + 1);
        self.pending.clear();
        self.updated = false;
        self.inserted = false;
        self.deleted = false;
        self.on_row()
    }
}

/// 负数落在第一行之前，超出 usize 的取最大值
fn clamp_cursor(target: i64) -> usize {
    usize::try_from(target.max(0)).unwrap_or(usize::MAX)
}

/// 内存结果集
#[derive(Debug)]
pub struct MockResultSet {
    id: u64,
    options: StatementOptions,
    shared: Arc<MockShared>,
    statement: Option<Weak<MockStatement>>,
    state: Mutex<ResultSetState>,
}

impl MockResultSet {
    pub(crate) fn new(
        rows: MockRows,
        options: StatementOptions,
        shared: Arc<MockShared>,
        statement: Option<Weak<MockStatement>>,
    ) -> Arc<Self> {
        let id = shared.next_id();
        // 公开字段可能被直接修改，按列数补齐或截断
        let width = rows.columns.len();
        let mut data = rows.rows;
        for row in &mut data {
            row.resize(width, Value::Null);
        }
        Arc::new(Self {
            id,
            options,
            shared,
            statement,
            state: Mutex::new(ResultSetState {
                columns: rows.columns,
                rows: data,
                cursor: 0,
                closed: false,
                was_null: false,
                warnings: Vec::new(),
                fetch_direction: FetchDirection::Forward,
                fetch_size: 0,
                pending: HashMap::new(),
                insert_buffer: None,
                updated: false,
                inserted: false,
                deleted: false,
            }),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn label(&self) -> String {
        format!("result_set#{}", self.id)
    }

    /// 当前全部行，包含已提交的更新
    pub fn rows(&self) -> Vec<Vec<Value>> {
        self.state.lock().rows.clone()
    }

    pub(crate) fn close_silently(&self) {
        self.state.lock().closed = true;
    }

    fn enter(&self, operation: &'static str, args: Vec<String>) -> SqlResult<()> {
        self.shared.enter(&self.label(), operation, args)
    }

    fn check_open(&self) -> SqlResult<()> {
        if self.state.lock().closed {
            Err(SqlError::Closed(self.label()))
        } else {
            Ok(())
        }
    }

    fn check_scrollable(&self) -> SqlResult<()> {
        self.check_open()?;
        if self.options.result_set_type == ResultSetType::ForwardOnly {
            return Err(SqlError::FeatureNotSupported(format!(
                "{} 只能向前移动",
                self.label()
            )));
        }
        Ok(())
    }

    fn check_updatable(&self) -> SqlResult<()> {
        self.check_open()?;
        if self.options.concurrency != Concurrency::Updatable {
            return Err(SqlError::FeatureNotSupported(format!("{} 只读", self.label())));
        }
        Ok(())
    }

    fn read(&self, column: Column<'_>) -> SqlResult<Value> {
        self.check_open()?;
        let mut state = self.state.lock();
        let index = state.resolve(column)?;
        let value = if let Some(buffer) = &state.insert_buffer {
            buffer[index - 1].clone()
        } else if state.on_row() {
            match state.pending.get(&index) {
                Some(value) => value.clone(),
                None => state.rows[state.cursor - 1][index - 1].clone(),
            }
        } else {
            return Err(SqlError::InvalidArgument("游标不在有效行上".to_string()));
        };
        state.was_null = value.is_null();
        Ok(value)
    }

    fn write(&self, column: Column<'_>, value: Value) -> SqlResult<()> {
        self.check_updatable()?;
        let mut state = self.state.lock();
        let index = state.resolve(column)?;
        if let Some(buffer) = state.insert_buffer.as_mut() {
            buffer[index - 1] = value;
            return Ok(());
        }
        if !state.on_row() {
            return Err(SqlError::InvalidArgument("游标不在有效行上".to_string()));
        }
        state.pending.insert(index, value);
        Ok(())
    }

    fn stream(&self, column: Column<'_>) -> SqlResult<Option<Box<dyn Read + Send>>> {
        let bytes = convert(&self.read(column)?, "stream", Value::as_bytes)?;
        Ok(bytes.map(|b| Box::new(Cursor::new(b)) as Box<dyn Read + Send>))
    }
}

impl Wrapper for MockResultSet {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn unwrap_any(&self, key: TypeKey) -> SqlResult<&dyn Any> {
        self.shared.unwrap_self(&self.label(), self, key)
    }

    fn is_wrapper_for_any(&self, key: TypeKey) -> SqlResult<bool> {
        self.shared.is_self(&self.label(), self, key)
    }
}

impl ResultSet for MockResultSet {
    fn next(&self) -> SqlResult<bool> {
        self.enter("next", args!())?;
        self.check_open()?;
        let mut state = self.state.lock();
        let cursor = state.cursor + 1;
        Ok(state.move_to(cursor))
    }

    fn previous(&self) -> SqlResult<bool> {
        self.enter("previous", args!())?;
        self.check_scrollable()?;
        let mut state = self.state.lock();
        let cursor = state.cursor.saturating_sub(1);
        Ok(state.move_to(cursor))
    }

    fn first(&self) -> SqlResult<bool> {
        self.enter("first", args!())?;
        self.check_scrollable()?;
        let mut state = self.state.lock();
        if state.rows.is_empty() {
            return Ok(false);
        }
        Ok(state.move_to(1))
    }

    fn last(&self) -> SqlResult<bool> {
        self.enter("last", args!())?;
        self.check_scrollable()?;
        let mut state = self.state.lock();
        let len = state.rows.len();
        if len == 0 {
            return Ok(false);
        }
        Ok(state.move_to(len))
    }

    fn before_first(&self) -> SqlResult<()> {
        self.enter("before_first", args!())?;
        self.check_scrollable()?;
        self.state.lock().move_to(0);
        Ok(())
    }

    fn after_last(&self) -> SqlResult<()> {
        self.enter("after_last", args!())?;
        self.check_scrollable()?;
        let mut state = self.state.lock();
        let end = state.rows.len() + 1;
        state.move_to(end);
        Ok(())
    }

    fn absolute(&self, row: i64) -> SqlResult<bool> {
        self.enter("absolute", args!(row))?;
        self.check_scrollable()?;
        let mut state = self.state.lock();
        let len = state.rows.len() as i64;
        let target = if row >= 0 {
            row
        } else {
            (len + 1).saturating_add(row)
        };
        Ok(state.move_to(clamp_cursor(target)))
    }

    fn relative(&self, rows: i64) -> SqlResult<bool> {
        self.enter("relative", args!(rows))?;
        self.check_scrollable()?;
        let mut state = self.state.lock();
        let target = (state.cursor as i64).saturating_add(rows);
        Ok(state.move_to(clamp_cursor(target)))
    }

    fn row(&self) -> SqlResult<usize> {
        self.enter("row", args!())?;
        let state = self.state.lock();
        Ok(if state.on_row() { state.cursor } else { 0 })
    }

    fn is_before_first(&self) -> SqlResult<bool> {
        self.enter("is_before_first", args!())?;
        let state = self.state.lock();
        Ok(state.cursor == 0 && !state.rows.is_empty())
    }

    fn is_after_last(&self) -> SqlResult<bool> {
        self.enter("is_after_last", args!())?;
        let state = self.state.lock();
        Ok(!state.rows.is_empty() && state.cursor > state.rows.len())
    }

    fn is_first(&self) -> SqlResult<bool> {
        self.enter("is_first", args!())?;
        let state = self.state.lock();
        Ok(state.cursor == 1 && !state.rows.is_empty())
    }

    fn is_last(&self) -> SqlResult<bool> {
        self.enter("is_last", args!())?;
        let state = self.state.lock();
        Ok(!state.rows.is_empty() && state.cursor == state.rows.len())
    }

    fn close(&self) -> SqlResult<()> {
        self.enter("close", args!())?;
        let was_open = !std::mem::replace(&mut self.state.lock().closed, true);
        if was_open {
            if let Some(stmt) = self.statement.as_ref().and_then(Weak::upgrade) {
                stmt.on_result_closed();
            }
        }
        Ok(())
    }

    fn is_closed(&self) -> SqlResult<bool> {
        self.enter("is_closed", args!())?;
        Ok(self.state.lock().closed)
    }

    fn was_null(&self) -> SqlResult<bool> {
        self.enter("was_null", args!())?;
        Ok(self.state.lock().was_null)
    }

    fn get_value(&self, column: Column<'_>) -> SqlResult<Value> {
        self.enter("get_value", args!(column))?;
        self.read(column)
    }

    fn get_string(&self, column: Column<'_>) -> SqlResult<Option<String>> {
        self.enter("get_string", args!(column))?;
        convert(&self.read(column)?, "String", Value::as_text)
    }

    fn get_bool(&self, column: Column<'_>) -> SqlResult<Option<bool>> {
        self.enter("get_bool", args!(column))?;
        convert(&self.read(column)?, "bool", Value::as_bool)
    }

    fn get_i8(&self, column: Column<'_>) -> SqlResult<Option<i8>> {
        self.enter("get_i8", args!(column))?;
        convert(&self.read(column)?, "i8", |v| {
            v.as_i64().and_then(|n| i8::try_from(n).ok())
        })
    }

    fn get_i16(&self, column: Column<'_>) -> SqlResult<Option<i16>> {
        self.enter("get_i16", args!(column))?;
        convert(&self.read(column)?, "i16", |v| {
            v.as_i64().and_then(|n| i16::try_from(n).ok())
        })
    }

    fn get_i32(&self, column: Column<'_>) -> SqlResult<Option<i32>> {
        self.enter("get_i32", args!(column))?;
        convert(&self.read(column)?, "i32", |v| {
            v.as_i64().and_then(|n| i32::try_from(n).ok())
        })
    }

    fn get_i64(&self, column: Column<'_>) -> SqlResult<Option<i64>> {
        self.enter("get_i64", args!(column))?;
        convert(&self.read(column)?, "i64", Value::as_i64)
    }

    fn get_f32(&self, column: Column<'_>) -> SqlResult<Option<f32>> {
        self.enter("get_f32", args!(column))?;
        convert(&self.read(column)?, "f32", |v| v.as_f64().map(|n| n as f32))
    }

    fn get_f64(&self, column: Column<'_>) -> SqlResult<Option<f64>> {
        self.enter("get_f64", args!(column))?;
        convert(&self.read(column)?, "f64", Value::as_f64)
    }

    fn get_decimal(&self, column: Column<'_>) -> SqlResult<Option<String>> {
        self.enter("get_decimal", args!(column))?;
        convert(&self.read(column)?, "decimal", Value::as_text)
    }

    fn get_bytes(&self, column: Column<'_>) -> SqlResult<Option<Vec<u8>>> {
        self.enter("get_bytes", args!(column))?;
        convert(&self.read(column)?, "bytes", Value::as_bytes)
    }

    fn get_date(&self, column: Column<'_>) -> SqlResult<Option<NaiveDate>> {
        self.enter("get_date", args!(column))?;
        convert(&self.read(column)?, "date", Value::as_date)
    }

    fn get_time(&self, column: Column<'_>) -> SqlResult<Option<NaiveTime>> {
        self.enter("get_time", args!(column))?;
        convert(&self.read(column)?, "time", Value::as_time)
    }

    fn get_timestamp(&self, column: Column<'_>) -> SqlResult<Option<NaiveDateTime>> {
        self.enter("get_timestamp", args!(column))?;
        convert(&self.read(column)?, "timestamp", Value::as_timestamp)
    }

    fn get_binary_stream(&self, column: Column<'_>) -> SqlResult<Option<Box<dyn Read + Send>>> {
        self.enter("get_binary_stream", args!(column))?;
        self.stream(column)
    }

    fn get_character_stream(
        &self,
        column: Column<'_>,
    ) -> SqlResult<Option<Box<dyn Read + Send>>> {
        self.enter("get_character_stream", args!(column))?;
        self.stream(column)
    }

    fn find_column(&self, label: &str) -> SqlResult<usize> {
        self.enter("find_column", args!(label))?;
        self.check_open()?;
        self.state.lock().resolve(Column::Label(label))
    }

    fn warnings(&self) -> SqlResult<Vec<Warning>> {
        self.enter("warnings", args!())?;
        Ok(self.state.lock().warnings.clone())
    }

    fn clear_warnings(&self) -> SqlResult<()> {
        self.enter("clear_warnings", args!())?;
        self.state.lock().warnings.clear();
        Ok(())
    }

    fn cursor_name(&self) -> SqlResult<String> {
        self.enter("cursor_name", args!())?;
        Ok(format!("cursor_{}", self.id))
    }

    fn metadata(&self) -> SqlResult<Arc<dyn ResultSetMetaData>> {
        self.enter("metadata", args!())?;
        self.check_open()?;
        let state = self.state.lock();
        let rows = MockRows {
            columns: state.columns.clone(),
            rows: state.rows.iter().take(1).cloned().collect(),
        };
        Ok(MockResultSetMetaData::from_rows(&rows))
    }

    fn set_fetch_direction(&self, direction: FetchDirection) -> SqlResult<()> {
        self.enter("set_fetch_direction", args!(direction))?;
        self.check_open()?;
        self.state.lock().fetch_direction = direction;
        Ok(())
    }

    fn fetch_direction(&self) -> SqlResult<FetchDirection> {
        self.enter("fetch_direction", args!())?;
        Ok(self.state.lock().fetch_direction)
    }

    fn set_fetch_size(&self, rows: usize) -> SqlResult<()> {
        self.enter("set_fetch_size", args!(rows))?;
        self.check_open()?;
        self.state.lock().fetch_size = rows;
        Ok(())
    }

    fn fetch_size(&self) -> SqlResult<usize> {
        self.enter("fetch_size", args!())?;
        Ok(self.state.lock().fetch_size)
    }

    fn result_set_type(&self) -> SqlResult<ResultSetType> {
        self.enter("result_set_type", args!())?;
        Ok(self.options.result_set_type)
    }

    fn concurrency(&self) -> SqlResult<Concurrency> {
        self.enter("concurrency", args!())?;
        Ok(self.options.concurrency)
    }

    fn holdability(&self) -> SqlResult<Holdability> {
        self.enter("holdability", args!())?;
        Ok(self
            .options
            .holdability
            .unwrap_or(Holdability::HoldCursorsOverCommit))
    }

    fn row_updated(&self) -> SqlResult<bool> {
        self.enter("row_updated", args!())?;
        Ok(self.state.lock().updated)
    }

    fn row_inserted(&self) -> SqlResult<bool> {
        self.enter("row_inserted", args!())?;
        Ok(self.state.lock().inserted)
    }

    fn row_deleted(&self) -> SqlResult<bool> {
        self.enter("row_deleted", args!())?;
        Ok(self.state.lock().deleted)
    }

    fn update_value(&self, column: Column<'_>, value: Value) -> SqlResult<()> {
        self.enter("update_value", args!(column, value))?;
        self.write(column, value)
    }

    fn update_null(&self, column: Column<'_>, sql_type: SqlType) -> SqlResult<()> {
        self.enter("update_null", args!(column, sql_type))?;
        self.write(column, Value::Null)
    }

    fn insert_row(&self) -> SqlResult<()> {
        self.enter("insert_row", args!())?;
        self.check_updatable()?;
        let mut state = self.state.lock();
        let row = state
            .insert_buffer
            .as_ref()
            .cloned()
            .ok_or_else(|| SqlError::InvalidArgument("游标不在插入行上".to_string()))?;
        let width = row.len();
        state.rows.push(row);
        state.inserted = true;
        state.insert_buffer = Some(vec![Value::Null; width]);
        Ok(())
    }

    fn update_row(&self) -> SqlResult<()> {
        self.enter("update_row", args!())?;
        self.check_updatable()?;
        let mut state = self.state.lock();
        if state.insert_buffer.is_some() || !state.on_row() {
            return Err(SqlError::InvalidArgument("游标不在有效行上".to_string()));
        }
        let row = state.cursor - 1;
        let pending: Vec<(usize, Value)> = state.pending.drain().collect();
        for (index, value) in pending {
            state.rows[row][index - 1] = value;
        }
        state.updated = true;
        Ok(())
    }

    fn delete_row(&self) -> SqlResult<()> {
        self.enter("delete_row", args!())?;
        self.check_updatable()?;
        let mut state = self.state.lock();
        if state.insert_buffer.is_some() || !state.on_row() {
            return Err(SqlError::InvalidArgument("游标不在有效行上".to_string()));
        }
        let row = state.cursor - 1;
        state.rows.remove(row);
        state.cursor -= 1;
        state.pending.clear();
        state.deleted = true;
        Ok(())
    }

    fn refresh_row(&self) -> SqlResult<()> {
        self.enter("refresh_row", args!())?;
        self.check_open()?;
        self.state.lock().pending.clear();
        Ok(())
    }

    fn cancel_row_updates(&self) -> SqlResult<()> {
        self.enter("cancel_row_updates", args!())?;
        self.check_updatable()?;
        self.state.lock().pending.clear();
        Ok(())
    }

    fn move_to_insert_row(&self) -> SqlResult<()> {
        self.enter("move_to_insert_row", args!())?;
        self.check_updatable()?;
        let mut state = self.state.lock();
        let width = state.columns.len();
        state.insert_buffer = Some(vec![Value::Null; width]);
        Ok(())
    }

    fn move_to_current_row(&self) -> SqlResult<()> {
        self.enter("move_to_current_row", args!())?;
        self.check_updatable()?;
        self.state.lock().insert_buffer = None;
        Ok(())
    }

    fn statement(&self) -> SqlResult<Option<Arc<dyn Statement>>> {
        self.enter("statement", args!())?;
        match &self.statement {
            None => Ok(None),
            Some(weak) => weak
                .upgrade()
                .map(|stmt| Some(stmt as Arc<dyn Statement>))
                .ok_or(SqlError::OwnerReleased("statement")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> MockRows {
        MockRows::new(&["id", "name"])
            .with_row(vec![Value::Int(1), Value::String("alice".into())])
            .with_row(vec![Value::Int(2), Value::Null])
            .with_row(vec![Value::Int(3), Value::String("carol".into())])
    }

    fn result_set(options: StatementOptions) -> Arc<MockResultSet> {
        MockResultSet::new(rows(), options, Arc::new(MockShared::default()), None)
    }

    #[test]
    fn test_forward_iteration() {
        let rs = result_set(StatementOptions::default());
        assert!(rs.is_before_first().unwrap());
        assert!(rs.next().unwrap());
        assert_eq!(rs.get_i32(Column::Index(1)).unwrap(), Some(1));
        assert_eq!(rs.get_string(Column::Label("NAME")).unwrap().as_deref(), Some("alice"));

        assert!(rs.next().unwrap());
        assert_eq!(rs.get_string(Column::Label("name")).unwrap(), None);
        assert!(rs.was_null().unwrap());

        assert!(rs.next().unwrap());
        assert!(rs.is_last().unwrap());
        assert!(!rs.next().unwrap());
        assert!(rs.is_after_last().unwrap());
        assert_eq!(rs.row().unwrap(), 0);
        assert!(matches!(rs.previous(), Err(SqlError::FeatureNotSupported(_))));
    }

    #[test]
    fn test_scrolling() {
        let rs = result_set(StatementOptions::new(
            ResultSetType::ScrollInsensitive,
            Concurrency::ReadOnly,
        ));
        assert!(rs.last().unwrap());
        assert_eq!(rs.row().unwrap(), 3);
        assert!(rs.absolute(-3).unwrap());
        assert!(rs.is_first().unwrap());
        assert!(rs.relative(1).unwrap());
        assert_eq!(rs.get_i64(Column::Index(1)).unwrap(), Some(2));
        assert!(!rs.absolute(10).unwrap());
        assert!(rs.is_after_last().unwrap());
    }

    #[test]
    fn test_scrolling_extreme_offsets() {
        let rs = result_set(StatementOptions::new(
            ResultSetType::ScrollInsensitive,
            Concurrency::ReadOnly,
        ));
        assert!(rs.next().unwrap());
        assert!(!rs.relative(i64::MAX).unwrap());
        assert!(rs.is_after_last().unwrap());
        assert!(!rs.relative(i64::MIN).unwrap());
        assert!(rs.is_before_first().unwrap());

        assert!(!rs.absolute(i64::MAX).unwrap());
        assert!(rs.is_after_last().unwrap());
        assert!(!rs.absolute(i64::MIN).unwrap());
        assert!(rs.is_before_first().unwrap());
        assert!(rs.absolute(-1).unwrap());
        assert_eq!(rs.row().unwrap(), 3);
    }

    #[test]
    fn test_rows_padded_to_column_count() {
        let mut short = MockRows::new(&["a", "b"]);
        short.rows.push(vec![Value::Int(1)]);
        short.rows.push(vec![Value::Int(2), Value::Int(3), Value::Int(4)]);
        let rs = MockResultSet::new(
            short,
            StatementOptions::new(ResultSetType::ScrollInsensitive, Concurrency::Updatable),
            Arc::new(MockShared::default()),
            None,
        );

        assert!(rs.next().unwrap());
        assert_eq!(rs.get_value(Column::Index(2)).unwrap(), Value::Null);
        assert!(rs.was_null().unwrap());
        rs.update_value(Column::Index(2), Value::Int(9)).unwrap();
        rs.update_row().unwrap();

        assert!(rs.next().unwrap());
        assert_eq!(rs.get_i32(Column::Index(2)).unwrap(), Some(3));
        assert!(rs.get_value(Column::Index(3)).is_err());

        assert_eq!(
            rs.rows(),
            vec![
                vec![Value::Int(1), Value::Int(9)],
                vec![Value::Int(2), Value::Int(3)],
            ]
        );
    }

    #[test]
    fn test_bad_column() {
        let rs = result_set(StatementOptions::default());
        rs.next().unwrap();
        assert!(rs.get_value(Column::Index(3)).is_err());
        assert!(rs.find_column("missing").is_err());
        assert_eq!(rs.find_column("name").unwrap(), 2);
        assert!(rs.get_i32(Column::Index(2)).is_err());
    }

    #[test]
    fn test_updates() {
        let rs = result_set(StatementOptions::new(
            ResultSetType::ScrollSensitive,
            Concurrency::Updatable,
        ));
        rs.next().unwrap();
        rs.update_value(Column::Label("name"), Value::String("alicia".into()))
            .unwrap();
        rs.update_row().unwrap();
        assert!(rs.row_updated().unwrap());

        rs.move_to_insert_row().unwrap();
        rs.update_value(Column::Index(1), Value::Int(4)).unwrap();
        rs.insert_row().unwrap();
        rs.move_to_current_row().unwrap();

        let all = rs.rows();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0][1], Value::String("alicia".into()));
        assert_eq!(all[3], vec![Value::Int(4), Value::Null]);
    }

    #[test]
    fn test_read_only_rejects_updates() {
        let rs = result_set(StatementOptions::default());
        rs.next().unwrap();
        assert!(matches!(
            rs.update_value(Column::Index(1), Value::Int(9)),
            Err(SqlError::FeatureNotSupported(_))
        ));
    }

    #[test]
    fn test_statement_absent_for_detached() {
        let rs = result_set(StatementOptions::default());
        assert!(rs.statement().unwrap().is_none());
        rs.close().unwrap();
        assert!(matches!(rs.next(), Err(SqlError::Closed(_))));
    }
}
