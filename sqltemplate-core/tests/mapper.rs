mod common;

#[cfg(test)]
mod tests {
    use crate::common::{Employee, VecCursor};
    use sqltemplate_core::{
        Coercion, DataError, LabeledMapper, MapperBuilder, RecordMapper, RowCursor, RowMapper,
        SingleColumnMapper, Value,
    };
    use time::macros::date;

    fn emp_cursor(columns: &[&str]) -> VecCursor {
        VecCursor::new(
            columns,
            vec![vec![
                Value::Int32(Some(7369)),
                Value::Varchar(Some("SMITH".into())),
                Value::Date(Some(date!(1980 - 12 - 17))),
                Value::Varchar(Some("CLERK".into())),
            ]],
        )
    }

    #[test]
    fn uppercase_labels_map_onto_members() {
        let mut cursor = emp_cursor(&["EMPNO", "ENAME", "HIREDATE", "JOB"]);
        assert!(cursor.advance().unwrap());
        let mapper = RecordMapper::<Employee>::new(Coercion::utc());
        let employee = mapper.map_row(&mut cursor, 0).unwrap();
        assert_eq!(
            employee,
            Employee {
                empno: 7369,
                ename: "SMITH".into(),
                hire_date: Some(date!(1980 - 12 - 17)),
            }
        );
    }

    #[test]
    fn unmapped_columns_and_members_are_ignored() {
        let mut cursor = VecCursor::new(
            &["ename", "LOC"],
            vec![vec![
                Value::Varchar(Some("KING".into())),
                Value::Varchar(Some("NEW YORK".into())),
            ]],
        );
        assert!(cursor.advance().unwrap());
        let employee = MapperBuilder::default()
            .record::<Employee>()
            .map_row(&mut cursor, 0)
            .unwrap();
        assert_eq!(
            employee,
            Employee {
                empno: 0,
                ename: "KING".into(),
                hire_date: None,
            }
        );
    }

    #[test]
    fn null_columns_keep_defaults() {
        let mut cursor = VecCursor::new(
            &["EMPNO", "HIRE_DATE"],
            vec![vec![Value::Int32(None), Value::Date(None)]],
        );
        assert!(cursor.advance().unwrap());
        let employee = RecordMapper::<Employee>::new(Coercion::utc())
            .map_row(&mut cursor, 0)
            .unwrap();
        assert_eq!(employee, Employee::default());
    }

    #[test]
    fn mapping_failures_name_the_member() {
        let mut cursor = VecCursor::new(&["EMPNO"], vec![vec![Value::Varchar(Some("x".into()))]]);
        assert!(cursor.advance().unwrap());
        let error = RecordMapper::<Employee>::new(Coercion::utc())
            .map_row(&mut cursor, 0)
            .unwrap_err();
        assert!(format!("{error:#}").contains("Employee"), "{error:#}");
        assert!(
            DataError::all(&error).any(|e| matches!(e, DataError::Coercion { .. })),
            "{error:#}"
        );
    }

    #[test]
    fn single_column_rows() {
        let mut cursor = VecCursor::integers(1);
        assert!(cursor.advance().unwrap());
        let mapper = SingleColumnMapper::<i64>::new(Coercion::utc());
        assert_eq!(mapper.map_row(&mut cursor, 0).unwrap(), 0);

        let mut cursor = emp_cursor(&["EMPNO", "ENAME", "HIREDATE", "JOB"]);
        assert!(cursor.advance().unwrap());
        let error = SingleColumnMapper::<i32>::new(Coercion::utc())
            .map_row(&mut cursor, 0)
            .unwrap_err();
        assert!(matches!(
            error.downcast_ref::<DataError>(),
            Some(DataError::IncorrectColumnCount {
                expected: 1,
                actual: 4
            })
        ));

        let mut cursor = VecCursor::new(&["COMM"], vec![vec![Value::Int32(None)]]);
        assert!(cursor.advance().unwrap());
        let mapper = MapperBuilder::default().mapper::<Option<i32>>();
        assert_eq!(mapper.map_row(&mut cursor, 0).unwrap(), None);
    }

    #[test]
    fn labeled_rows() {
        let mut cursor = emp_cursor(&["EMPNO", "ENAME", "HIRE DATE", "JOB"]);
        assert!(cursor.advance().unwrap());
        let row = LabeledMapper.map_row(&mut cursor, 0).unwrap();
        assert_eq!(row.names().len(), 4);
        assert_eq!(row.get_column("ename"), Some(&Value::Varchar(Some("SMITH".into()))));
        assert_eq!(
            row.get_column("hiredate"),
            Some(&Value::Date(Some(date!(1980 - 12 - 17))))
        );
        assert!(row.get_column("sal").is_none());
    }

    #[test]
    fn closures_are_mappers() {
        let mut cursor = emp_cursor(&["EMPNO", "ENAME", "HIREDATE", "JOB"]);
        assert!(cursor.advance().unwrap());
        let mapper = |cursor: &mut dyn RowCursor, row: usize| -> sqltemplate_core::Result<String> {
            let name = cursor.column_value(1, sqltemplate_core::SqlType::Varchar)?;
            Ok(format!("{row}: {name:?}"))
        };
        assert_eq!(
            mapper.map_row(&mut cursor, 0).unwrap(),
            "0: Varchar(Some(\"SMITH\"))"
        );
    }
}
