use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{AsSlot, BoxError, Engine, Entry, Error, FieldValue, Result, Slot, translator_fn};

#[derive(Debug, Default, Clone)]
struct User {
    id: i64,
    name: String,
    sex: String,
    sex_name: String,
    priority: i32,
    priority_name: String,
    dept: Option<Box<Dept>>,
    roles: Vec<Role>,
}

translatable! {
    User {
        id: r#"db:"user:id:name" dictField:"name""#,
        name,
        sex: r#"dict:"sex" dictField:"sex_name""#,
        sex_name,
        priority: r#"enum:"priority" dictField:"priority_name""#,
        priority_name,
        dept,
        roles,
    }
}

#[derive(Debug, Default, Clone)]
struct Dept {
    kind: String,
    kind_name: String,
}

translatable! {
    Dept {
        kind: r#"dictTable:"dept_kind" dictField:"kind_name""#,
        kind_name,
    }
}

#[derive(Debug, Default, Clone)]
struct Role {
    code: String,
    code_name: String,
}

translatable! {
    Role {
        code: r#"dictTableTwo:"role" dictField:"code_name""#,
        code_name,
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Ticket {
    sex: String,
    sex_name: String,
}

translatable! {
    Ticket {
        sex: r#"dict:"sex" dictField:"sex_name""#,
        sex_name,
    }
}

fn engine() -> Engine {
    let engine = Engine::new();
    engine.register_dict("sex", [("1", "男"), ("2", "女")]);
    engine.register_enum("priority", [("1", "低"), ("2", "中"), ("3", "高")]);
    engine
}

fn count_db_queries(engine: &Engine) -> Arc<AtomicUsize> {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    engine.register_db_query(
        move |table: &str, key_field: &str, value_field: &str, key: &FieldValue| -> Result<String, BoxError> {
            counter.fetch_add(1, Ordering::SeqCst);
            match (table, key_field, value_field, key) {
                ("user", "id", "name", FieldValue::Int(1)) => Ok("张三".into()),
                ("user", "id", "name", FieldValue::Int(13)) => Err("connection refused".into()),
                _ => Ok(String::new()),
            }
        },
    );
    calls
}

fn user(id: i64, sex: &str, priority: i32) -> User {
    User { id, sex: sex.into(), priority, ..User::default() }
}

// --- Single records ----------------------------------------------------------

#[test]
fn memory_dict_enum_and_db_fields() {
    let engine = engine();
    count_db_queries(&engine);

    let mut u = user(1, "1", 2);
    engine.translate(&mut u).unwrap();

    assert_eq!(u.sex_name, "男");
    assert_eq!(u.priority_name, "中");
    assert_eq!(u.name, "张三");
}

#[test]
fn misses_leave_targets_untouched() {
    let engine = engine();
    count_db_queries(&engine);

    let mut u = User { sex: "9".into(), sex_name: "keep".into(), priority: 7, id: 2, ..User::default() };
    engine.translate(&mut u).unwrap();

    assert_eq!(u.sex_name, "keep");
    assert_eq!(u.priority_name, "");
    assert_eq!(u.name, "");
}

#[test]
fn db_results_are_cached_per_key() {
    let engine = engine();
    let calls = count_db_queries(&engine);

    engine.translate(&mut user(1, "1", 1)).unwrap();
    engine.translate(&mut user(1, "2", 1)).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    engine.set_db_cache_enabled(false);
    engine.translate(&mut user(1, "1", 1)).unwrap();
    engine.translate(&mut user(1, "1", 1)).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    engine.set_db_cache_enabled(true);
    engine.clear_db_cache();
    engine.translate(&mut user(1, "1", 1)).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[test]
fn missing_db_query_is_an_error() {
    let engine = engine();
    let err = engine.translate(&mut user(1, "1", 1)).unwrap_err();
    assert!(matches!(err, Error::TranslatorNotRegistered(crate::Backend::Db)));
}

#[test]
fn missing_enum_table_is_an_error() {
    let engine = Engine::new();
    engine.register_db_query(|_: &str, _: &str, _: &str, _: &FieldValue| -> Result<String, BoxError> { Ok(String::new()) });
    let err = engine.translate(&mut user(1, "1", 1)).unwrap_err();
    assert!(matches!(err, Error::EnumNotFound(name) if name == "priority"));
}

// --- Nesting -----------------------------------------------------------------

#[test]
fn nested_pointers_and_sequences_are_translated() {
    let engine = engine();
    count_db_queries(&engine);
    engine.register_dict_table_query(|dict_type: &str, key: &str| -> Result<String, BoxError> {
        Ok(if (dict_type, key) == ("dept_kind", "rd") { "研发".into() } else { String::new() })
    });
    engine.register_dict_table_two_query(|dict_type: &str, key: &str| -> Result<String, BoxError> {
        Ok(match (dict_type, key) {
            ("role", "admin") => "管理员".into(),
            ("role", "guest") => "访客".into(),
            _ => String::new(),
        })
    });

    let mut u = user(1, "1", 1);
    u.dept = Some(Box::new(Dept { kind: "rd".into(), ..Dept::default() }));
    u.roles = vec![
        Role { code: "admin".into(), ..Role::default() },
        Role { code: "guest".into(), ..Role::default() },
    ];
    engine.translate(&mut u).unwrap();

    assert_eq!(u.dept.as_ref().unwrap().kind_name, "研发");
    assert_eq!(u.roles[0].code_name, "管理员");
    assert_eq!(u.roles[1].code_name, "访客");
    assert_eq!(u.sex_name, "男");
}

#[derive(Default)]
struct Level {
    sex: String,
    sex_name: String,
    child: Option<Box<Level>>,
}

translatable! {
    Level {
        sex: r#"dict:"sex" dictField:"sex_name""#,
        sex_name,
        child,
    }
}

#[test]
fn every_nesting_level_is_resolved() {
    let engine = engine();
    let mut root = (0..6).fold(None, |child, depth| {
        Some(Box::new(Level { sex: if depth % 2 == 0 { "1" } else { "2" }.into(), child, ..Level::default() }))
    });
    engine.translate(&mut root).unwrap();

    let mut depth = 0;
    let mut node = root.as_deref();
    while let Some(level) = node {
        assert_eq!(level.sex_name, if level.sex == "1" { "男" } else { "女" });
        node = level.child.as_deref();
        depth += 1;
    }
    assert_eq!(depth, 6);
    assert_eq!(engine.cached_plans(), 1);
}

#[test]
fn nil_pointers_are_skipped() {
    let engine = engine();
    count_db_queries(&engine);

    let mut u = user(1, "2", 3);
    engine.translate(&mut u).unwrap();
    assert!(u.dept.is_none());
    assert_eq!(u.sex_name, "女");

    let mut items: Vec<Option<Box<Ticket>>> = vec![None, Some(Box::new(Ticket { sex: "1".into(), ..Ticket::default() }))];
    engine.translate_slice(&mut items).unwrap();
    assert_eq!(items[1].as_ref().unwrap().sex_name, "男");
}

// --- Entry contract ----------------------------------------------------------

#[test]
fn by_value_entries_are_rejected() {
    let engine = engine();
    assert!(matches!(engine.translate(7), Err(Error::NotPointer(_))));
    assert!(matches!(engine.translate("x"), Err(Error::NotPointer(_))));
    assert!(matches!(engine.batch_translate(String::new(), true), Err(Error::NotPointer(_))));
}

#[test]
fn non_records_are_rejected() {
    let engine = engine();
    let mut n = 7_i32;
    assert!(matches!(engine.translate(&mut n), Err(Error::NotStruct("int"))));

    let mut nil: Option<Box<Ticket>> = None;
    assert!(matches!(engine.translate(&mut nil), Err(Error::NotStruct("pointer"))));
}

#[test]
fn slice_entry_points_require_sequences() {
    let engine = engine();
    let mut t = Ticket::default();
    assert!(matches!(engine.translate_slice(&mut t), Err(Error::NotSlice("struct"))));
    assert!(matches!(engine.batch_translate(&mut t, false), Err(Error::NotSlice("struct"))));
}

#[test]
fn translate_accepts_sequences_too() {
    let engine = engine();
    let mut tickets = vec![Ticket { sex: "2".into(), ..Ticket::default() }];
    engine.translate(&mut tickets).unwrap();
    assert_eq!(tickets[0].sex_name, "女");

    let mut array = [Ticket { sex: "1".into(), ..Ticket::default() }];
    engine.translate(&mut array[..]).unwrap();
    assert_eq!(array[0].sex_name, "男");
}

// --- Plans -------------------------------------------------------------------

#[test]
fn plans_are_built_once_per_type() {
    let engine = engine();
    assert_eq!(engine.cached_plans(), 0);
    for _ in 0..3 {
        engine.translate(&mut Ticket { sex: "1".into(), ..Ticket::default() }).unwrap();
    }
    assert_eq!(engine.cached_plans(), 1);
}

#[test]
fn concurrent_first_use_builds_one_plan() {
    let engine = engine();
    let threads = 8;
    let start = std::sync::Barrier::new(threads);

    let tickets: Vec<Ticket> = std::thread::scope(|s| {
        let tasks: Vec<_> = (0..threads)
            .map(|i| {
                let (engine, start) = (&engine, &start);
                s.spawn(move || {
                    let mut ticket = Ticket { sex: if i % 2 == 0 { "1" } else { "2" }.into(), ..Ticket::default() };
                    start.wait();
                    engine.translate(&mut ticket).unwrap();
                    ticket
                })
            })
            .collect();
        tasks.into_iter().map(|task| task.join().unwrap()).collect()
    });

    assert_eq!(engine.cached_plans(), 1);
    for (i, ticket) in tickets.iter().enumerate() {
        assert_eq!(ticket.sex_name, if i % 2 == 0 { "男" } else { "女" });
    }
}

#[derive(Default)]
struct Upload {
    kind: String,
    kind_name: String,
    payload: Vec<u8>,
    tags: Vec<String>,
}

translatable! {
    Upload {
        kind: r#"dict:"sex" dictField:"kind_name""#,
        kind_name,
        payload,
        tags,
    }
}

#[test]
fn scalar_sequence_fields_are_left_alone() {
    let engine = engine();
    let mut upload =
        Upload { kind: "2".into(), payload: vec![7; 1 << 20], tags: vec!["a".into(), "b".into()], ..Upload::default() };
    for _ in 0..3 {
        engine.translate(&mut upload).unwrap();
    }
    assert_eq!(upload.kind_name, "女");
    assert_eq!(upload.payload.len(), 1 << 20);
    assert_eq!(upload.tags, ["a", "b"]);

    let mut bytes = vec![1_u8, 2, 3];
    engine.translate_slice(&mut bytes).unwrap();
}

#[test]
fn custom_translators_see_field_name_and_full_tag() {
    #[derive(Default)]
    struct Order {
        owner: i64,
        owner_name: String,
    }

    translatable! {
        Order {
            owner: r#"translate:"user,nickname" dictField:"OWNER_NAME""#,
            owner_name,
        }
    }

    let engine = Engine::new();
    engine.register_translator(
        "user",
        translator_fn(|value, field, tag| Ok(format!("{field}:{value}:{tag}"))),
    );

    let mut order = Order { owner: 42, ..Order::default() };
    engine.translate(&mut order).unwrap();
    assert_eq!(order.owner_name, "owner:42:user,nickname");
}

#[test]
fn custom_translator_errors_abort() {
    #[derive(Default)]
    struct Order {
        first: String,
        first_name: String,
        second: String,
        second_name: String,
    }

    translatable! {
        Order {
            first: r#"dict:"sex" dictField:"first_name""#,
            first_name,
            second: r#"translate:"boom" dictField:"second_name""#,
            second_name,
        }
    }

    let engine = engine();
    engine.register_translator("boom", translator_fn(|_, _, _| Err("exploded".into())));

    let mut order = Order { first: "1".into(), second: "x".into(), ..Order::default() };
    let err = engine.translate(&mut order).unwrap_err();
    assert!(matches!(&err, Error::Custom { tag, .. } if tag == "boom"));
    // Fields before the failing one keep their labels.
    assert_eq!(order.first_name, "男");
    assert_eq!(order.second_name, "");
}

// --- Unwrappers --------------------------------------------------------------

struct Page {
    total: usize,
    items: Vec<Ticket>,
}

#[test]
fn wrapped_entries_use_registered_unwrapper() {
    let engine = engine();
    let mut page = Page { total: 2, items: vec![Ticket { sex: "1".into(), ..Ticket::default() }; 2] };

    assert!(matches!(engine.translate(Entry::wrapped(&mut page)), Err(Error::NotStruct(_))));

    engine.register_unwrapper(|page: &mut Page| page.items.as_slot());
    engine.translate(Entry::wrapped(&mut page)).unwrap();
    assert_eq!(page.total, 2);
    assert!(page.items.iter().all(|t| t.sex_name == "男"));
}

// --- Batches -----------------------------------------------------------------

fn tickets(n: usize) -> Vec<Ticket> {
    (0..n).map(|i| Ticket { sex: if i % 3 == 0 { "2" } else { "1" }.into(), ..Ticket::default() }).collect()
}

#[test]
fn parallel_and_sequential_batches_agree() {
    let engine = engine();
    for n in [0, 1, 9, 10, 11, 37, 100] {
        let mut sequential = tickets(n);
        let mut parallel = tickets(n);
        engine.batch_translate(&mut sequential, false).unwrap();
        engine.batch_translate(&mut parallel, true).unwrap();
        assert_eq!(sequential, parallel, "n = {n}");
        assert!(parallel.iter().all(|t| !t.sex_name.is_empty()));
    }
}

#[test]
fn parallel_batch_reports_query_errors() {
    let engine = engine();
    count_db_queries(&engine);

    let mut users: Vec<User> = (0..25).map(|i| user(if i == 13 { 13 } else { 1 }, "1", 1)).collect();
    let err = engine.batch_translate(&mut users, true).unwrap_err();
    assert!(matches!(err, Error::QueryFailed { backend: crate::Backend::Db, .. }));
    // Chunks without the failing record complete.
    assert_eq!(users[0].name, "张三");
    assert_eq!(users[24].name, "张三");
}

#[test]
fn sequential_batch_stops_at_first_error() {
    let engine = engine();
    count_db_queries(&engine);

    let mut users = vec![user(1, "1", 1), user(13, "1", 1), user(1, "2", 1)];
    assert!(engine.batch_translate(&mut users, false).is_err());
    assert_eq!(users[0].sex_name, "男");
    assert_eq!(users[2].sex_name, "");
}

#[test]
fn batch_threshold_and_workers_follow_config() {
    let mut config = crate::Config::default();
    config.performance.parallel_threshold = 2;
    config.performance.max_workers = 3;
    let engine = Engine::with_config(config);
    engine.register_dict("sex", [("1", "男"), ("2", "女")]);

    let mut items = tickets(5);
    engine.batch_translate(&mut items, true).unwrap();
    assert_eq!(items.iter().map(|t| t.sex_name.as_str()).collect::<Vec<_>>(), ["女", "男", "男", "女", "男"]);
}

#[test]
fn disabled_cache_config_starts_backends_disabled() {
    let mut config = crate::Config::default();
    config.cache.enabled = false;
    let engine = Engine::with_config(config);
    assert!(!engine.result_cache(crate::Backend::Db).is_enabled());
    assert!(!engine.result_cache(crate::Backend::DictTableTwo).is_enabled());
}

#[test]
fn sequence_slots_can_be_built_by_hand() {
    let engine = engine();
    let mut a = Ticket { sex: "1".into(), ..Ticket::default() };
    let mut b = Ticket { sex: "2".into(), ..Ticket::default() };
    let slots = vec![a.as_slot(), Slot::Opaque("skip"), b.as_slot()];
    engine.batch_translate(Entry::Slot(Slot::Sequence(slots)), false).unwrap();
    assert_eq!((a.sex_name.as_str(), b.sex_name.as_str()), ("男", "女"));
}
