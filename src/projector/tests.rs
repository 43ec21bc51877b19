use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use super::*;
use crate::ast::*;
use crate::error::AstError;

fn project(select: &Select) -> Value {
    let text = to_json(select).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn select_of(expr: Expr) -> Select {
    Select::with_columns(vec![ResultColumn::new(expr)])
}

fn first_expr(doc: &Value) -> &Value {
    &doc["columns"][0]["expr"]
}

#[test]
fn test_simple_select_shape() {
    let doc = project(&select_of(Expr::binary(
        BinaryOp::Add,
        Expr::int(1),
        Expr::int(2),
    )));
    assert_eq!(
        doc,
        json!({
            "type": "select",
            "distinct": false,
            "all": false,
            "columns": [{
                "expr": {
                    "type": "binary",
                    "op": "+",
                    "left": {"type": "integer", "value": 1},
                    "right": {"type": "integer", "value": 2}
                },
                "alias": null
            }],
            "from": null,
            "where": null,
            "group_by": null,
            "having": null,
            "order_by": null,
            "limit": null
        })
    );
    assert!(doc.get("offset").is_none());
    assert!(doc.get("with").is_none());
    assert!(doc.get("window_definitions").is_none());
}

#[test]
fn test_case_parity() {
    let list = vec![
        Expr::name("a"),
        Expr::int(1),
        Expr::name("b"),
        Expr::int(2),
        Expr::int(3),
    ];
    let doc = project(&select_of(Expr::Case {
        operand: None,
        list,
    }));
    let case = first_expr(&doc);
    assert_eq!(case["operand"], Value::Null);
    assert_eq!(case["when_clauses"].as_array().unwrap().len(), 2);
    assert_eq!(case["when_clauses"][1]["when"], json!({"type": "name", "name": "b"}));
    assert_eq!(case["else"], json!({"type": "integer", "value": 3}));

    let doc = project(&select_of(Expr::Case {
        operand: Some(Box::new(Expr::name("x"))),
        list: vec![Expr::int(1), Expr::string("one")],
    }));
    let case = first_expr(&doc);
    assert_eq!(case["operand"]["name"], "x");
    assert_eq!(case["else"], Value::Null);
}

#[test]
fn test_between_arity_is_malformed() {
    let bad = select_of(Expr::Between {
        expr: Box::new(Expr::name("x")),
        list: vec![Expr::int(1)],
    });
    assert!(matches!(to_json(&bad), Err(AstError::MalformedTree(_))));

    let good = select_of(Expr::Between {
        expr: Box::new(Expr::name("x")),
        list: vec![Expr::int(1), Expr::int(9)],
    });
    let doc = project(&good);
    assert_eq!(first_expr(&doc)["high"]["value"], 9);
}

#[test]
fn test_large_integer_keeps_text() {
    let doc = project(&select_of(Expr::Integer(IntLiteral::from_token(
        "9223372036854775807",
    ))));
    assert_eq!(
        first_expr(&doc),
        &json!({"type": "integer", "value": "9223372036854775807"})
    );
}

#[test]
fn test_alias_fidelity() {
    let mut select = select_of(Expr::name("a"));
    select
        .columns
        .push(ResultColumn::aliased(Expr::name("b"), "x"));
    let doc = project(&select);
    assert_eq!(doc["columns"][0]["alias"], Value::Null);
    assert_eq!(doc["columns"][1]["alias"], "x");
}

#[test]
fn test_limit_offset_presence() {
    let mut select = select_of(Expr::int(1));
    select.limit = Some(Limit {
        limit: Expr::int(5),
        offset: None,
    });
    let doc = project(&select);
    assert_eq!(doc["limit"]["value"], 5);
    assert_eq!(doc.get("offset"), Some(&Value::Null));

    select.limit = Some(Limit {
        limit: Expr::int(5),
        offset: Some(Expr::int(2)),
    });
    let doc = project(&select);
    assert_eq!(doc["offset"]["value"], 2);
}

#[test]
fn test_compound_order_and_operators() {
    let a = select_of(Expr::name("a"));
    let mut b = select_of(Expr::name("b"));
    b.op = CompoundOp::Union;
    b.prior = Some(Box::new(a));
    let mut c = select_of(Expr::name("c"));
    c.op = CompoundOp::Except;
    c.prior = Some(Box::new(b));
    c.order_by = Some(vec![OrderItem::asc(Expr::int(1))]);

    let doc = project(&c);
    assert_eq!(doc["type"], "compound");
    let body = doc["body"].as_array().unwrap();
    assert_eq!(body.len(), 3);
    assert!(body[0].get("operator").is_none());
    assert_eq!(body[1]["operator"], "UNION");
    assert_eq!(body[2]["operator"], "EXCEPT");
    assert_eq!(first_expr(&body[0]["select"])["name"], "a");
    assert!(body[2]["select"].get("order_by").is_none());
    assert!(body[2]["select"].get("limit").is_none());
    assert_eq!(doc["order_by"][0]["direction"], "ASC");
    assert_eq!(doc["limit"], Value::Null);
    assert!(doc.get("offset").is_none());
}

#[test]
fn test_compound_keeps_with() {
    let cte = Cte {
        name: "t".into(),
        columns: vec![],
        materialized: Materialized::Any,
        select: Box::new(select_of(Expr::int(1))),
    };
    let mut tail = select_of(Expr::int(2));
    tail.op = CompoundOp::UnionAll;
    tail.prior = Some(Box::new(select_of(Expr::int(1))));
    tail.with = Some(With {
        recursive: false,
        ctes: vec![cte],
    });
    let doc = project(&tail);
    assert_eq!(doc["with"][0]["name"], "t");
    assert!(doc["with"][0].get("columns").is_none());
    assert!(doc["with"][0].get("materialized").is_none());
    assert_eq!(doc["body"][1]["operator"], "UNION ALL");
}

#[test]
fn test_nulls_policy() {
    let item = |desc, nulls_large| OrderItem {
        expr: Expr::name("y"),
        desc,
        nulls_large,
    };
    let mut select = select_of(Expr::Star);
    select.order_by = Some(vec![
        item(false, None),
        item(false, Some(true)),
        item(false, Some(false)),
        item(true, Some(false)),
        item(true, Some(true)),
    ]);
    let doc = project(&select);
    let order = doc["order_by"].as_array().unwrap();
    assert!(order[0].get("nulls").is_none());
    assert_eq!(order[1]["nulls"], "LAST");
    assert_eq!(order[2]["nulls"], "FIRST");
    assert_eq!(order[3]["direction"], "DESC");
    assert_eq!(order[3]["nulls"], "LAST");
    assert_eq!(order[4]["nulls"], "FIRST");
}

#[test]
fn test_join_phrases() {
    let natural = JoinType::NATURAL;
    let outer = JoinType::OUTER;
    assert_eq!(join_phrase(JoinType::NONE), None);
    assert_eq!(join_phrase(JoinType::LTORJ), None);
    assert_eq!(join_phrase(JoinType::INNER), Some("JOIN"));
    assert_eq!(join_phrase(JoinType::INNER | JoinType::CROSS), Some("CROSS JOIN"));
    assert_eq!(join_phrase(natural), Some("NATURAL JOIN"));
    assert_eq!(join_phrase(natural | JoinType::INNER), Some("NATURAL JOIN"));
    assert_eq!(join_phrase(JoinType::LEFT | outer), Some("LEFT JOIN"));
    assert_eq!(
        join_phrase(natural | JoinType::RIGHT | outer),
        Some("NATURAL RIGHT JOIN")
    );
    assert_eq!(
        join_phrase(JoinType::LEFT | JoinType::RIGHT | outer),
        Some("FULL OUTER JOIN")
    );
    assert_eq!(
        join_phrase(natural | JoinType::LEFT | JoinType::RIGHT | outer),
        Some("NATURAL FULL OUTER JOIN")
    );
}

#[test]
fn test_source_items() {
    let mut users = SourceItem::table("users");
    users.source = Source::Table {
        name: "users".into(),
        schema: Some("main".into()),
        fixed_schema: false,
    };
    users.alias = Some("u".into());

    let mut pinned = SourceItem::table("sqlite_schema");
    pinned.source = Source::Table {
        name: "sqlite_schema".into(),
        schema: Some("temp".into()),
        fixed_schema: true,
    };
    pinned.join_type = JoinType::INNER;
    pinned.constraint = Some(JoinConstraint::Using(vec!["id".into(), "k".into()]));

    let mut series = SourceItem::table("generate_series");
    series.join_type = JoinType::LEFT | JoinType::OUTER;
    series.func_args = Some(vec![Expr::int(1), Expr::int(3)]);
    series.constraint = Some(JoinConstraint::On(Expr::Boolean(true)));

    let doc = project(&Select::star_from(vec![users, pinned, series]));
    let from = doc["from"].as_array().unwrap();
    assert_eq!(
        from[0],
        json!({"type": "table", "name": "users", "schema": "main", "alias": "u", "join_type": null})
    );
    assert!(from[1].get("schema").is_none());
    assert_eq!(from[1]["join_type"], "JOIN");
    assert_eq!(from[1]["using"], json!(["id", "k"]));
    assert!(from[1].get("on").is_none());
    assert_eq!(from[2]["join_type"], "LEFT JOIN");
    assert_eq!(from[2]["on"], json!({"type": "boolean", "value": true}));
    assert_eq!(from[2]["args"].as_array().unwrap().len(), 2);
}

#[test]
fn test_function_and_window() {
    let mut count = FunctionCall::new("count", vec![]);
    count.args = None;
    let mut window = Window::new(WindowFrame::Spec(Frame::implicit()));
    window.partition_by = Some(vec![Expr::name("g")]);
    count.window = Some(Box::new(window));

    let mut filtered = FunctionCall::new("sum", vec![Expr::name("x")]);
    filtered.distinct = true;
    filtered.order_by = Some(vec![Expr::name("x")]);
    let mut marker = Window::new(WindowFrame::FilterOnly);
    marker.filter = Some(Expr::name("ok"));
    filtered.window = Some(Box::new(marker));

    let mut select = select_of(Expr::function(count));
    select.columns.push(ResultColumn::new(Expr::function(filtered)));
    let doc = project(&select);

    let count = first_expr(&doc);
    assert_eq!(count["args"], json!([]));
    assert_eq!(count["distinct"], false);
    assert!(count.get("order_by").is_none());
    assert_eq!(
        count["over"],
        json!({
            "name": null,
            "base": null,
            "partition_by": [{"type": "name", "name": "g"}],
            "frame": {
                "type": "RANGE",
                "start": {"type": "UNBOUNDED"},
                "end": {"type": "CURRENT ROW"}
            }
        })
    );

    let sum = &doc["columns"][1]["expr"];
    assert_eq!(sum["distinct"], true);
    assert_eq!(sum["order_by"], json!([{"type": "name", "name": "x"}]));
    assert!(sum.get("over").is_none());
}

#[test]
fn test_window_definitions() {
    let mut named = Window::new(WindowFrame::Spec(Frame {
        units: FrameUnits::Rows,
        start: FrameBound::Preceding(Box::new(Expr::int(2))),
        end: FrameBound::Following(Box::new(Expr::Null)),
        exclude: Some(FrameExclude::Ties),
        implicit: false,
    }));
    named.name = Some("w".into());
    named.order_by = Some(vec![OrderItem::asc(Expr::name("t"))]);
    let mut reference = Window::new(WindowFrame::None);
    reference.name = Some("v".into());
    reference.base = Some("w".into());

    let mut select = select_of(Expr::Star);
    select.windows = vec![named, reference];
    let doc = project(&select);
    let defs = doc["window_definitions"].as_array().unwrap();
    assert_eq!(
        defs[0]["frame"],
        json!({
            "type": "ROWS",
            "start": {"type": "PRECEDING", "expr": {"type": "integer", "value": 2}},
            "end": {"type": "FOLLOWING", "expr": {"type": "null"}},
            "exclude": "TIES"
        })
    );
    assert_eq!(defs[0]["order_by"][0]["expr"]["name"], "t");
    assert_eq!(defs[1], json!({"name": "v", "base": "w"}));
}

#[test]
fn test_rare_variants() {
    let exprs = vec![
        Expr::Truth {
            negated: true,
            value: false,
            operand: Box::new(Expr::name("a")),
        },
        Expr::Raise {
            action: RaiseAction::Abort,
            message: Some("boom".into()),
        },
        Expr::Raise {
            action: RaiseAction::Ignore,
            message: None,
        },
        Expr::Span {
            text: "a+1".into(),
            expr: Box::new(Expr::name("a")),
        },
        Expr::Unknown { op: 177 },
        Expr::Vector(vec![Expr::int(1), Expr::Null]),
        Expr::Collate {
            expr: Box::new(Expr::string("x")),
            collation: "nocase".into(),
        },
    ];
    let select = Select::with_columns(exprs.into_iter().map(ResultColumn::new).collect());
    let doc = project(&select);
    let col = |i: usize| doc["columns"][i]["expr"].clone();
    assert_eq!(
        col(0),
        json!({"type": "truth_test", "op": "IS NOT FALSE", "operand": {"type": "name", "name": "a"}})
    );
    assert_eq!(col(1), json!({"type": "raise", "action": "ABORT", "message": "boom"}));
    assert_eq!(col(2), json!({"type": "raise", "action": "IGNORE"}));
    assert_eq!(col(3)["text"], "a+1");
    assert_eq!(col(4), json!({"type": "unknown", "op": 177}));
    assert_eq!(col(5)["values"][1], json!({"type": "null"}));
    assert_eq!(col(6)["collation"], "nocase");
}

#[test]
fn test_in_forms() {
    let values = Expr::In {
        expr: Box::new(Expr::name("x")),
        rhs: InRhs::Values(vec![Expr::int(1), Expr::int(2)]),
    };
    let sub = Expr::In {
        expr: Box::new(Expr::name("x")),
        rhs: InRhs::Select(Box::new(select_of(Expr::int(1)))),
    };
    let mut select = select_of(values);
    select.where_clause = Some(sub);
    let doc = project(&select);
    assert_eq!(first_expr(&doc)["values"].as_array().unwrap().len(), 2);
    assert!(first_expr(&doc).get("select").is_none());
    assert_eq!(doc["where"]["select"]["type"], "select");
    assert!(doc["where"].get("values").is_none());
}

#[test]
fn test_projection_is_deterministic() {
    let mut select = select_of(Expr::Exists(Box::new(select_of(Expr::Star))));
    select.group_by = Some(vec![Expr::name("g")]);
    select.having = Some(Expr::unary(UnaryOp::Not, Expr::name("h")));
    assert_eq!(to_json(&select).unwrap(), to_json(&select).unwrap());
}

#[test]
fn test_overflow_reported() {
    let select = select_of(Expr::string("x".repeat(64)));
    let projector = Projector::new(crate::json::WriterOptions {
        max_bytes: 32,
        indent: 2,
    });
    assert!(matches!(
        projector.project(&select),
        Err(AstError::OutputOverflow { limit: 32 })
    ));
}
