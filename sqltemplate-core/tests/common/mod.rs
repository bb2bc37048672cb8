#![allow(dead_code)]

use sqltemplate_core::{
    Coercion, Error, FromValue, Member, Record, Result, RowCursor, SqlType, ToValue, Value,
};
use std::{cell::Cell, rc::Rc};
use time::Date;

#[derive(Default, Clone)]
pub struct Counters {
    pub advances: Rc<Cell<usize>>,
    pub releases: Rc<Cell<usize>>,
}

/// Cursor over rows kept in memory, failing when advancing onto `fail_at`.
pub struct VecCursor {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    position: usize,
    fail_at: Option<usize>,
    counters: Counters,
}

impl VecCursor {
    pub fn new(columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns: columns.iter().map(|v| v.to_string()).collect(),
            rows,
            position: 0,
            fail_at: None,
            counters: Counters::default(),
        }
    }
    pub fn integers(count: i32) -> Self {
        Self::new(
            &["N"],
            (0..count).map(|i| vec![Value::Int32(Some(i))]).collect(),
        )
    }
    pub fn fail_at(mut self, row: usize) -> Self {
        self.fail_at = Some(row);
        self
    }
    pub fn counters(&self) -> Counters {
        self.counters.clone()
    }
}

impl RowCursor for VecCursor {
    fn columns(&self) -> &[String] {
        &self.columns
    }
    fn advance(&mut self) -> Result<bool> {
        self.counters.advances.set(self.counters.advances.get() + 1);
        if self.fail_at == Some(self.position) {
            return Err(Error::msg(format!("Network error at row {}", self.position)));
        }
        if self.position < self.rows.len() {
            self.position += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }
    fn column_value(&mut self, index: usize, _hint: SqlType) -> Result<Value> {
        Ok(self.rows[self.position - 1][index].clone())
    }
}

impl Drop for VecCursor {
    fn drop(&mut self) {
        self.counters.releases.set(self.counters.releases.get() + 1);
    }
}

/// Mapping table written by hand, mutable target.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Employee {
    pub empno: i32,
    pub ename: String,
    pub hire_date: Option<Date>,
}

impl Record for Employee {
    fn members() -> &'static [Member] {
        static MEMBERS: [Member; 3] = [
            Member::field("empno", "i32", SqlType::Integer),
            Member::field("ename", "String", SqlType::Varchar),
            Member::field("hireDate", "Option<Date>", SqlType::Date),
        ];
        &MEMBERS
    }
    fn read_member(&self, index: usize, coercion: &Coercion) -> Result<Option<Value>> {
        match index {
            0 => self.empno.to_value(coercion).map(Some),
            1 => self.ename.to_value(coercion).map(Some),
            2 => self.hire_date.to_value(coercion).map(Some),
            _ => Ok(None),
        }
    }
    fn from_members(values: Vec<(usize, Value)>, coercion: &Coercion) -> Result<Self> {
        let mut result = Employee::default();
        for (i, v) in values {
            match i {
                0 if !v.is_null() => result.empno = i32::from_value(v, coercion)?,
                1 if !v.is_null() => result.ename = String::from_value(v, coercion)?,
                2 => result.hire_date = Option::<Date>::from_value(v, coercion)?,
                _ => {}
            }
        }
        Ok(result)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Dept {
    pub deptno: i32,
    pub job: String,
}

impl Record for Dept {
    fn members() -> &'static [Member] {
        static MEMBERS: [Member; 2] = [
            Member::field("deptno", "i32", SqlType::Integer),
            Member::field("job", "String", SqlType::Varchar),
        ];
        &MEMBERS
    }
    fn read_member(&self, index: usize, coercion: &Coercion) -> Result<Option<Value>> {
        match index {
            0 => self.deptno.to_value(coercion).map(Some),
            1 => self.job.to_value(coercion).map(Some),
            _ => Ok(None),
        }
    }
    fn from_members(values: Vec<(usize, Value)>, coercion: &Coercion) -> Result<Self> {
        let mut result = Dept::default();
        for (i, v) in values {
            match i {
                0 => result.deptno = i32::from_value(v, coercion)?,
                1 => result.job = String::from_value(v, coercion)?,
                _ => {}
            }
        }
        Ok(result)
    }
}
