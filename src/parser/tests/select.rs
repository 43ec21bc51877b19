use super::{error, select};
use crate::ast::*;
use crate::parser::parse;

#[test]
fn test_simple_select() {
    let select = select("SELECT * FROM foo WHERE x > 5 ORDER BY y");
    assert_eq!(select.columns, vec![ResultColumn::new(Expr::Star)]);
    assert_eq!(select.from, vec![SourceItem::table("foo")]);
    assert_eq!(
        select.where_clause,
        Some(Expr::binary(BinaryOp::Gt, Expr::name("x"), Expr::int(5)))
    );
    assert_eq!(select.order_by, Some(vec![OrderItem::asc(Expr::name("y"))]));
    assert!(!select.is_compound());
}

#[test]
fn test_aliases() {
    let select = select("SELECT a + 1 AS x, b y, c, t.* FROM t");
    assert_eq!(select.columns[0].alias.as_deref(), Some("x"));
    assert_eq!(select.columns[1].alias.as_deref(), Some("y"));
    assert_eq!(select.columns[2].alias, None);
    assert_eq!(
        select.columns[3].expr,
        Expr::Dot {
            left: Box::new(Expr::name("t")),
            right: Box::new(Expr::Star),
        }
    );
}

#[test]
fn test_distinct_and_all() {
    assert!(select("SELECT DISTINCT a FROM t").distinct);
    let all = select("SELECT ALL a FROM t");
    assert!(all.all);
    assert!(!all.distinct);
}

#[test]
fn test_group_by_having() {
    let select = select("SELECT a, count(*) FROM t GROUP BY a HAVING count(*) > 1");
    assert_eq!(select.group_by, Some(vec![Expr::name("a")]));
    assert!(select.having.is_some());
}

#[test]
fn test_limit_forms() {
    let plain = select("SELECT a FROM t LIMIT 10");
    assert_eq!(
        plain.limit,
        Some(Limit {
            limit: Expr::int(10),
            offset: None,
        })
    );
    let offset = select("SELECT a FROM t LIMIT 10 OFFSET 5");
    assert_eq!(
        offset.limit,
        Some(Limit {
            limit: Expr::int(10),
            offset: Some(Expr::int(5)),
        })
    );
    // The comma form lists the offset first.
    let comma = select("SELECT a FROM t LIMIT 5, 10");
    assert_eq!(comma.limit, offset.limit);
}

#[test]
fn test_nulls_ordering() {
    let select = select(
        "SELECT a FROM t ORDER BY a NULLS FIRST, b DESC NULLS LAST, c DESC NULLS FIRST, d NULLS LAST",
    );
    let flags: Vec<(bool, Option<bool>)> = select
        .order_by
        .unwrap()
        .iter()
        .map(|item| (item.desc, item.nulls_large))
        .collect();
    assert_eq!(
        flags,
        vec![
            (false, Some(false)),
            (true, Some(false)),
            (true, Some(true)),
            (false, Some(true)),
        ]
    );
}

#[test]
fn test_compound_chain() {
    let select = select("SELECT 1 UNION SELECT 2 EXCEPT SELECT 3 ORDER BY 1");
    let members = select.members();
    assert_eq!(members.len(), 3);
    assert_eq!(members[0].op, CompoundOp::Select);
    assert_eq!(members[1].op, CompoundOp::Union);
    assert_eq!(members[2].op, CompoundOp::Except);
    assert!(select.order_by.is_some());

    let all = crate::parser::tests::select("SELECT 1 UNION ALL SELECT 2 INTERSECT SELECT 3");
    assert_eq!(all.members()[1].op, CompoundOp::UnionAll);
    assert_eq!(all.op, CompoundOp::Intersect);
}

#[test]
fn test_compound_order_by_placement() {
    assert_eq!(
        error("SELECT 1 ORDER BY 1 UNION SELECT 2"),
        "ORDER BY clause should come after UNION not before"
    );
    assert_eq!(
        error("SELECT 1 LIMIT 1 UNION ALL SELECT 2"),
        "LIMIT clause should come after UNION ALL not before"
    );
}

#[test]
fn test_too_many_compound_terms() {
    let sql = vec!["SELECT 1"; 501].join(" UNION ");
    assert_eq!(error(&sql), "too many terms in compound SELECT");
    let sql = vec!["SELECT 1"; 500].join(" UNION ");
    assert_eq!(select(&sql).members().len(), 500);
}

#[test]
fn test_values() {
    let single = select("VALUES (1, 2)");
    assert!(!single.is_compound());
    assert_eq!(single.columns.len(), 2);

    let multi = select("VALUES (1), (2), (3)");
    let members = multi.members();
    assert_eq!(members.len(), 3);
    assert!(members[1..].iter().all(|m| m.op == CompoundOp::UnionAll));
}

#[test]
fn test_values_on_right_of_compound_is_wrapped() {
    let select = select("SELECT 1 UNION VALUES (2), (3)");
    let members = select.members();
    assert_eq!(members.len(), 2);
    assert_eq!(members[1].columns, vec![ResultColumn::new(Expr::Star)]);
    let Source::Subquery(rows) = &members[1].from[0].source else {
        panic!("expected subquery");
    };
    assert_eq!(rows.members().len(), 2);
}

#[test]
fn test_with_clause() {
    let select = select(
        "WITH RECURSIVE a(x, y) AS (SELECT 1, 2), b AS MATERIALIZED (SELECT 2), \
         c AS NOT MATERIALIZED (SELECT 3) SELECT * FROM a",
    );
    let with = select.with.expect("with clause");
    assert!(with.recursive);
    assert_eq!(with.ctes.len(), 3);
    assert_eq!(with.ctes[0].name, "a");
    assert_eq!(with.ctes[0].columns, vec!["x".to_string(), "y".to_string()]);
    assert_eq!(with.ctes[0].materialized, Materialized::Any);
    assert_eq!(with.ctes[1].materialized, Materialized::Yes);
    assert_eq!(with.ctes[2].materialized, Materialized::No);
}

#[test]
fn test_with_attaches_to_last_member() {
    let select = select("WITH a AS (SELECT 1) SELECT * FROM a UNION SELECT 2");
    assert!(select.with.is_some());
    assert!(select.members()[0].with.is_none());
}

#[test]
fn test_with_errors() {
    assert_eq!(
        error("WITH a AS (SELECT 1), A AS (SELECT 2) SELECT 1"),
        "duplicate WITH table name: A"
    );
    assert_eq!(
        error("WITH a(x DESC) AS (SELECT 1) SELECT 1"),
        "syntax error after column name \"x\""
    );
}

#[test]
fn test_join_types() {
    let select = select(
        "SELECT * FROM a, b JOIN c LEFT JOIN d NATURAL JOIN e CROSS JOIN f \
         FULL OUTER JOIN g NATURAL RIGHT JOIN h",
    );
    let joins: Vec<JoinType> = select.from.iter().map(|i| i.join_type).collect();
    assert_eq!(joins[0], JoinType::LTORJ);
    assert_eq!(joins[1], JoinType::LTORJ);
    assert_eq!(joins[2], JoinType::INNER | JoinType::LTORJ);
    assert_eq!(
        joins[3],
        JoinType::LEFT | JoinType::OUTER | JoinType::LTORJ
    );
    assert_eq!(joins[4], JoinType::NATURAL | JoinType::LTORJ);
    assert_eq!(
        joins[5],
        JoinType::INNER | JoinType::CROSS | JoinType::LTORJ
    );
    assert_eq!(
        joins[6],
        JoinType::LEFT | JoinType::RIGHT | JoinType::OUTER | JoinType::LTORJ
    );
    assert_eq!(
        joins[7],
        JoinType::NATURAL | JoinType::RIGHT | JoinType::OUTER
    );
}

#[test]
fn test_join_type_errors() {
    assert_eq!(
        error("SELECT * FROM a INNER OUTER JOIN b"),
        "unknown join type: INNER OUTER"
    );
    assert_eq!(
        error("SELECT * FROM a OUTER JOIN b"),
        "unknown join type: OUTER"
    );
    assert_eq!(
        error("SELECT * FROM a LEFT foo JOIN b"),
        "unknown join type: LEFT foo"
    );
}

#[test]
fn test_on_and_using() {
    let select = select("SELECT * FROM a JOIN b ON a.id = b.id JOIN c USING (id, k)");
    assert!(matches!(select.from[1].constraint, Some(JoinConstraint::On(_))));
    assert_eq!(
        select.from[2].constraint,
        Some(JoinConstraint::Using(vec!["id".into(), "k".into()]))
    );
    assert_eq!(
        error("SELECT * FROM a ON 1"),
        "a JOIN clause is required before ON"
    );
    assert_eq!(
        error("SELECT * FROM a USING (x)"),
        "a JOIN clause is required before USING"
    );
}

#[test]
fn test_table_items() {
    let select = select(
        "SELECT * FROM main.t AS x INDEXED BY i, u NOT INDEXED, json_each('[1]') j, f()",
    );
    assert_eq!(
        select.from[0].source,
        Source::Table {
            name: "t".into(),
            schema: Some("main".into()),
            fixed_schema: false,
        }
    );
    assert_eq!(select.from[0].alias.as_deref(), Some("x"));
    assert_eq!(select.from[1].alias, None);
    assert_eq!(select.from[2].func_args, Some(vec![Expr::string("[1]")]));
    assert_eq!(select.from[2].alias.as_deref(), Some("j"));
    assert_eq!(select.from[3].func_args, None);
}

#[test]
fn test_subquery_items() {
    let select = select("SELECT * FROM (SELECT 1) AS s JOIN (SELECT 2)");
    assert!(matches!(select.from[0].source, Source::Subquery(_)));
    assert_eq!(select.from[0].alias.as_deref(), Some("s"));
    assert_eq!(select.from[1].join_type, JoinType::INNER);
}

#[test]
fn test_parenthesized_join_lists() {
    // Unaliased leading list is flattened.
    let flat = select("SELECT * FROM (a JOIN b) JOIN c");
    assert_eq!(flat.from.len(), 3);
    assert_eq!(flat.from[1].join_type, JoinType::INNER);

    // A single item is lifted with the outer alias.
    let lifted = select("SELECT * FROM x JOIN (y) AS z");
    assert_eq!(lifted.from.len(), 2);
    assert_eq!(lifted.from[1].source, SourceItem::table("y").source);
    assert_eq!(lifted.from[1].alias.as_deref(), Some("z"));

    // Several items under an alias become a SELECT * subquery.
    let wrapped = select("SELECT * FROM x JOIN (y LEFT JOIN w) AS z ON 1");
    let Source::Subquery(inner) = &wrapped.from[1].source else {
        panic!("expected subquery");
    };
    assert_eq!(inner.columns, vec![ResultColumn::new(Expr::Star)]);
    assert_eq!(inner.from[0].join_type, JoinType::NONE);
    assert_eq!(inner.from[1].join_type, JoinType::LEFT | JoinType::OUTER);
    assert!(matches!(wrapped.from[1].constraint, Some(JoinConstraint::On(_))));
}

#[test]
fn test_statement_dispatch() {
    assert!(parse("").unwrap().is_none());
    assert!(parse(" ;; ").unwrap().is_none());
    assert!(parse("CREATE TABLE t(x)").unwrap().is_none());
    assert!(parse("insert into t values (1)").unwrap().is_none());
    assert!(
        parse("WITH a AS (SELECT 1) INSERT INTO t SELECT * FROM a")
            .unwrap()
            .is_none()
    );
    assert!(parse("EXPLAIN QUERY PLAN SELECT 1").unwrap().is_some());
    assert!(parse(";SELECT 1; garbage here").unwrap().is_some());
    assert_eq!(error("FOO"), "near \"FOO\": syntax error");
    assert_eq!(error("SELECT"), "incomplete input");
}

#[test]
fn test_other_statements_reject_illegal_tokens() {
    assert_eq!(error("CREATE (((( !!"), "unrecognized token: \"!\"");
    assert_eq!(
        error("WITH a AS (SELECT 1) DELETE FROM t WHERE x = 'open"),
        "unrecognized token: \"'open\""
    );
    match parse("DROP TABLE t $") {
        Err(err) => assert_eq!(err.position(), Some(13)),
        Ok(other) => panic!("expected error, got {other:?}"),
    }
    assert!(parse("CREATE TABLE t(x); SELECT !").unwrap().is_none());
}

#[test]
fn test_error_position() {
    match parse("SELECT 1 FROM") {
        Err(err) => assert_eq!(err.position(), Some(13)),
        Ok(other) => panic!("expected error, got {other:?}"),
    }
}
