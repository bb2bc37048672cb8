#[cfg(test)]
mod tests {
    use indoc::indoc;
    use sqltemplate::{
        Bound, DataError, Error, FromRow, FromValue, Parameters, Record, Result, RowCursor,
        RowLabeled, SqlTemplate, TextFile, Value,
    };
    use sqltemplate_tests::{Execution, MemoryExecutor, ResultSet, init_logs, silent_logs};
    use time::{
        Date, OffsetDateTime,
        macros::{date, datetime, offset},
    };
    use uuid::Uuid;

    const SQL_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/sql");

    #[derive(Record, Debug, Default, PartialEq)]
    #[record(rename_all = "camelCase")]
    struct Employee {
        empno: i32,
        ename: String,
        hire_date: Option<Date>,
        job: String,
    }

    #[derive(Record)]
    struct Filter {
        deptno: i32,
        job: String,
    }

    fn translation_of(error: &Error) -> Option<(&str, &str)> {
        DataError::all(error).find_map(|e| match e {
            DataError::Execution { operation, sql } => Some((operation.as_str(), sql.as_str())),
            _ => None,
        })
    }

    fn employees() -> ResultSet {
        ResultSet::new(["EMPNO", "ENAME", "HIREDATE", "JOB"])
            .row([
                Value::Int32(Some(7499)),
                Value::Varchar(Some("ALLEN".into())),
                Value::Date(Some(date!(1981 - 02 - 20))),
                Value::Varchar(Some("SALESMAN".into())),
            ])
            .row([
                Value::Int32(Some(7521)),
                Value::Varchar(Some("WARD".into())),
                Value::Date(Some(date!(1981 - 02 - 22))),
                Value::Varchar(Some("SALESMAN".into())),
            ])
    }

    #[test]
    fn named_parameters_from_a_record() {
        init_logs();
        let sql = indoc! {"
            SELECT empno, ename, hiredate, job
            FROM emp
            WHERE deptno = :deptno AND job = :job
        "};
        let mut template = SqlTemplate::new(MemoryExecutor::new().on_query(sql, employees()));
        let filter = Filter {
            deptno: 30,
            job: "SALESMAN".into(),
        };
        let params = template.record(&filter);
        let employees = template.for_list::<Employee>(sql, &params).unwrap();
        assert_eq!(employees.len(), 2);
        assert_eq!(employees[1].ename, "WARD");
        assert_eq!(
            template.executor().executions(),
            [Execution {
                sql: sql.into(),
                bound: vec![
                    (Some("deptno".into()), Bound::new(Value::Int32(Some(30)))),
                    (
                        Some("job".into()),
                        Bound::new(Value::Varchar(Some("SALESMAN".into())))
                    ),
                ],
            }]
        );
    }

    #[test]
    fn unknown_parameter_fails_the_query() {
        init_logs();
        let sql = "SELECT * FROM emp WHERE deptno = :deptno AND sal > :sal";
        let mut template = SqlTemplate::new(MemoryExecutor::new().on_query(sql, employees()));
        let filter = Filter {
            deptno: 30,
            job: "SALESMAN".into(),
        };
        let params = template.record(&filter);
        silent_logs! {
            let error = template.for_list::<Employee>(sql, &params).unwrap_err();
            assert_eq!(translation_of(&error), Some(("query", sql)));
            assert!(format!("{error:#}").contains("No value supplied for the SQL parameter 'sal'"));
        }
    }

    #[test]
    fn positional_and_map_parameters() {
        init_logs();
        let query = "SELECT empno, ename, hiredate, job FROM emp WHERE deptno = ?";
        let update = "UPDATE emp SET sal = :sal WHERE empno = :empno";
        let mut template = SqlTemplate::new(
            MemoryExecutor::new()
                .on_query(query, employees())
                .on_update(update, 1),
        );
        let params = template.args(&[&30]).unwrap();
        let names = template
            .for_list_with(query, &params, |row: &mut dyn RowCursor, _: usize| -> Result<String> {
                String::from_value(row.column_value(1, Default::default())?, &Default::default())
            })
            .unwrap();
        assert_eq!(names, ["ALLEN", "WARD"]);

        let params = template.map().add("sal", 1600).add("empno", 7499).into();
        assert_eq!(template.update(update, &params).unwrap(), 1);
        let executions = template.executor().executions();
        assert_eq!(executions.len(), 2);
        assert_eq!(executions[0].bound, [(None, Bound::new(Value::Int32(Some(30))))]);
        assert_eq!(
            executions[1].bound,
            [
                (Some("sal".into()), Bound::new(Value::Int32(Some(1600)))),
                (Some("empno".into()), Bound::new(Value::Int32(Some(7499)))),
            ]
        );
    }

    #[test]
    fn result_size() {
        init_logs();
        let all = "SELECT empno, ename, hiredate, job FROM emp";
        let none = "SELECT empno, ename, hiredate, job FROM emp WHERE 1 = 0";
        let mut template = SqlTemplate::new(
            MemoryExecutor::new()
                .on_query(all, employees())
                .on_query(none, ResultSet::new(["EMPNO", "ENAME", "HIREDATE", "JOB"])),
        );
        let params = Default::default();
        assert!(template.for_optional::<Employee>(none, &params).unwrap().is_none());
        let error = template.for_object::<Employee>(none, &params).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<DataError>(),
            Some(DataError::IncorrectResultSize {
                expected: 1,
                actual: 0
            })
        ));
        let error = template.for_optional::<Employee>(all, &params).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<DataError>(),
            Some(DataError::IncorrectResultSize {
                expected: 1,
                actual: 2
            })
        ));
    }

    #[test]
    fn single_values() {
        init_logs();
        let count = "SELECT count(*) FROM emp";
        let ids = "SELECT id FROM sessions";
        let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        let mut template = SqlTemplate::new(
            MemoryExecutor::new()
                .on_query(count, ResultSet::new(["COUNT(*)"]).row([Value::Int64(Some(14))]))
                .on_query(
                    ids,
                    ResultSet::new(["ID"])
                        .row([Value::Varchar(Some(id.to_string()))])
                        .row([Value::Uuid(None)]),
                ),
        );
        let params = Default::default();
        assert_eq!(template.for_object::<u32>(count, &params).unwrap(), 14);
        assert_eq!(
            template.for_list::<Option<Uuid>>(ids, &params).unwrap(),
            [Some(id), None]
        );
        let error = template.for_list::<Uuid>(ids, &params).unwrap_err();
        assert_eq!(translation_of(&error), Some(("stream", ids)));
    }

    #[test]
    fn labeled_rows() {
        init_logs();
        let sql = "SELECT empno, ename, hiredate, job FROM emp";
        let mut template = SqlTemplate::new(MemoryExecutor::new().on_query(sql, employees()));
        let rows = template
            .for_list::<RowLabeled>(sql, &Default::default())
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].names(), ["EMPNO", "ENAME", "HIREDATE", "JOB"]);
        assert_eq!(rows[0].get_column("empno"), Some(&Value::Int32(Some(7499))));
    }

    #[test]
    fn streams_release_their_cursor() {
        init_logs();
        let sql = "SELECT n FROM numbers";
        let mut numbers = ResultSet::new(["N"]);
        for n in 0..1000 {
            numbers = numbers.row([Value::Int32(Some(n))]);
        }
        let executor = MemoryExecutor::new().on_query(sql, numbers.clone().fail_at(500));
        let counters = executor.counters();
        let mut template = SqlTemplate::new(executor);
        let params = Default::default();

        let first = template
            .for_stream::<i32, _, _>(sql, &params, |rows| rows.take(5).collect::<Result<Vec<_>>>())
            .unwrap();
        assert_eq!(first, [0, 1, 2, 3, 4]);
        assert!(counters.advances() <= 6);
        assert_eq!((counters.opened(), counters.releases()), (1, 1));

        silent_logs! {
            let error = template.for_list::<i32>(sql, &params).unwrap_err();
            assert_eq!(translation_of(&error), Some(("stream", sql)));
            assert!(format!("{error:#}").contains("Connection reset while fetching row 500"));
        }
        assert_eq!((counters.opened(), counters.releases()), (2, 2));

        let error = template
            .for_stream::<i32, _, ()>(sql, &params, |rows| {
                rows.next_row()?;
                Err(Error::msg("Not interested"))
            })
            .unwrap_err();
        assert_eq!(error.to_string(), "Not interested");
        assert_eq!((counters.opened(), counters.releases()), (3, 3));
    }

    #[test]
    fn execution_failures_are_translated() {
        init_logs();
        let update = "DELETE FROM emp WHERE empno = ?";
        let mut template = SqlTemplate::new(
            MemoryExecutor::new().on_failure(update, "ORA-02292: integrity constraint violated"),
        );
        silent_logs! {
            let params = template.args(&[&7839]).unwrap();
            let error = template.update(update, &params).unwrap_err();
            assert_eq!(translation_of(&error), Some(("update", update)));
            assert_eq!(
                error.root_cause().to_string(),
                "ORA-02292: integrity constraint violated"
            );
            let error = template
                .for_list::<i32>("SELECT 1", &Default::default())
                .unwrap_err();
            assert_eq!(translation_of(&error), Some(("query", "SELECT 1")));
        }

        let mut template = SqlTemplate::new(MemoryExecutor::new()).with_translator(
            |operation: &str, sql: &str, error: Error| {
                error.context(format!("Bad SQL grammar during {operation}: {sql}"))
            },
        );
        let error = template.update("DROP TABLE emp", &Default::default()).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Bad SQL grammar during update: DROP TABLE emp"
        );
    }

    #[test]
    fn templates_from_files() {
        init_logs();
        let by_dept = indoc! {"
            SELECT empno, ename, hiredate, job
            FROM emp
            WHERE deptno = :deptno
              AND job = :job
            ORDER BY empno
        "};
        let raise = "UPDATE emp SET sal = sal * :factor WHERE empno = :empno";
        let mut template = SqlTemplate::new(
            MemoryExecutor::new()
                .on_query(by_dept, employees())
                .on_query("SELECT count(*) FROM emp", ResultSet::new(["C"]).row([Value::Int64(Some(2))]))
                .on_update(raise, 1),
        )
        .with_resolver(TextFile::new(SQL_ROOT).cached());

        let filter = Filter {
            deptno: 30,
            job: "SALESMAN".into(),
        };
        let params = template.record(&filter);
        let employees = template.for_list::<Employee>("emp/by_dept.sql", &params).unwrap();
        assert_eq!(employees[0].hire_date, Some(date!(1981 - 02 - 20)));
        assert_eq!(
            template.for_object::<i64>("emp/count.sql", &Default::default()).unwrap(),
            2
        );
        assert_eq!(
            template.executor().executions()[0].sql,
            by_dept.trim_end()
        );

        let batch = [(1.1, 7499), (1.2, 7521)]
            .into_iter()
            .map(|(factor, empno)| template.map().add("factor", factor).add("empno", empno).into())
            .collect::<Vec<Parameters>>();
        assert_eq!(template.batch_update("emp/raise.sql", &batch).unwrap(), [1, 1]);
        let executions = template.executor().executions();
        assert_eq!(executions.len(), 4);
        assert_eq!(
            executions[3].bound[0],
            (Some("factor".into()), Bound::new(Value::Float64(Some(1.2))))
        );
        assert_eq!(template.resolver().len(), 3);

        let error = template
            .for_list::<i64>("emp/missing.sql", &Default::default())
            .unwrap_err();
        assert!(matches!(
            error.downcast_ref::<DataError>(),
            Some(DataError::NotFound(resource)) if resource == "emp/missing.sql"
        ));
    }

    #[test]
    fn zoned_values_round_trip() {
        init_logs();
        let insert = "INSERT INTO audit (at) VALUES (?)";
        let select = "SELECT at FROM audit";
        let stored = Value::Timestamp(Some(datetime!(2024-03-01 12:30)));
        let mut template = SqlTemplate::new(
            MemoryExecutor::new()
                .on_update(insert, 1)
                .on_query(select, ResultSet::new(["AT"]).row([stored.clone()])),
        )
        .with_zone(offset!(+2));

        let at = datetime!(2024-03-01 10:30 UTC);
        let params = template.args(&[&at]).unwrap();
        template.update(insert, &params).unwrap();
        assert_eq!(template.executor().executions()[0].bound[0].1.value, stored);

        let read = template
            .for_object::<OffsetDateTime>(select, &Default::default())
            .unwrap();
        assert_eq!(read, at);
        assert_eq!(read.offset(), offset!(+2));
    }

    #[test]
    fn mappers_from_the_template() {
        let template = SqlTemplate::new(MemoryExecutor::new()).with_zone(offset!(-5));
        assert_eq!(template.coercion().zone(), offset!(-5));
        let _mapper: <Employee as FromRow>::Mapper = template.mappers().record::<Employee>();
        assert!(Employee::members().iter().any(|m| m.name == "hireDate"));
    }
}
