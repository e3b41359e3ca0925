use std::cell::RefCell;

use inflate::{
    Context, Converter, DecodeError, Decoder, DefaultProvider, FieldValue, FlattenPolicy,
    FlattenTarget, Kind, Provider, StructConverter,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

/// Records every context it is asked about; fails on one field name.
#[derive(Default)]
struct Recording {
    fail_on: Option<&'static str>,
    seen: RefCell<Vec<(String, Kind, bool)>>,
}

impl Provider for Recording {
    fn value(&self, ctx: &Context<'_>) -> inflate::Result<Option<Value>> {
        self.seen
            .borrow_mut()
            .push((ctx.field.to_string(), ctx.kind, ctx.is_zero));
        if self.fail_on == Some(ctx.field) {
            return Err(DecodeError::Provider(format!("no value for {}", ctx.field)));
        }
        Ok(Some(json!(format!("{}!", ctx.tag.name))))
    }
}

#[derive(Debug, Default, PartialEq)]
struct Triple {
    first: String,
    second: String,
    third: String,
}

inflate::record!(Triple {
    first => { "rec": "one" },
    second => { "rec": "two" },
    third => { "rec": "three" },
});

#[test]
fn test_fail_fast() {
    let provider = Recording {
        fail_on: Some("second"),
        ..Recording::default()
    };
    let mut triple = Triple {
        second: "before".into(),
        ..Triple::default()
    };
    let err = Decoder::new("rec", &provider, StructConverter::new("rec"))
        .decode(&mut triple)
        .unwrap_err();

    assert_eq!(err.to_string(), "provider error: no value for second");
    assert_eq!(triple.first, "one!");
    assert_eq!(triple.second, "before");
    assert_eq!(triple.third, "");
    let visited: Vec<_> = provider.seen.borrow().iter().map(|(f, _, _)| f.clone()).collect();
    assert_eq!(visited, vec!["first", "second"]);
}

#[test]
fn test_context_reports_kind_and_zero_state() {
    #[derive(Debug, Default)]
    struct Mixed {
        count: u32,
        names: Vec<String>,
        label: String,
    }

    inflate::record!(Mixed {
        count => { "rec": "count" },
        names => { "rec": "names" },
        label => { "rec": "label" },
    });

    let provider = Recording::default();
    let mut mixed = Mixed {
        label: "set".into(),
        ..Mixed::default()
    };
    Decoder::new("rec", &provider, StructConverter::new("rec"))
        .decode(&mut mixed)
        .unwrap_err();

    // "count!" is not a number, so the walk stops at the first field
    assert_eq!(
        *provider.seen.borrow(),
        vec![("count".to_string(), Kind::Uint, true)]
    );

    let provider = Recording::default();
    let mut mixed = Mixed {
        label: "set".into(),
        ..Mixed::default()
    };
    Decoder::new("rec", &provider, StructConverter::new("rec"))
        .decode(&mut mixed.label)
        .unwrap_err();
    assert!(provider.seen.borrow().is_empty());
}

/// Upper-cases strings, counts its calls.
#[derive(Default)]
struct Shouting {
    calls: RefCell<usize>,
}

impl Converter for Shouting {
    fn convert(&self, source: Option<&Value>, target: &mut dyn FieldValue) -> inflate::Result<()> {
        *self.calls.borrow_mut() += 1;
        match source {
            Some(Value::String(s)) => target.assign(&json!(s.to_uppercase()), "rec"),
            Some(other) => target.assign(other, "rec"),
            None => Ok(()),
        }
    }
}

#[test]
fn test_custom_converter() {
    let converter = Shouting::default();
    let mut triple = Triple::default();
    Decoder::new("rec", Recording::default(), &converter)
        .decode(&mut triple)
        .unwrap();
    assert_eq!(triple.first, "ONE!");
    assert_eq!(triple.third, "THREE!");
    assert_eq!(*converter.calls.borrow(), 3);
}

#[derive(Debug, Default, PartialEq)]
struct Outer {
    title: String,
    inner: Triple,
    level: u8,
}

inflate::record!(Outer {
    title => { "rec": "title" },
    inner => { "rec": "~" },
    level => { "rec": "~" },
});

#[test]
fn test_flatten_order_and_policy() {
    let provider = Recording::default();
    let mut outer = Outer {
        level: 9,
        ..Outer::default()
    };
    let err = Decoder::new("rec", &provider, StructConverter::new("rec"))
        .with_flatten_policy(FlattenPolicy::Reject)
        .decode(&mut outer)
        .unwrap_err();

    assert!(matches!(err, DecodeError::Flatten { type_name: "u8", .. }));
    let visited: Vec<_> = provider.seen.borrow().iter().map(|(f, _, _)| f.clone()).collect();
    assert_eq!(visited, vec!["title", "first", "second", "third"]);
    assert_eq!(outer.inner.second, "two!");
    assert_eq!(outer.level, 9);
}

#[test]
fn test_boxed_capabilities() {
    let provider: Box<dyn Provider> = Box::new(Recording::default());
    let converter: Box<dyn Converter> = Box::new(StructConverter::new("rec"));
    let mut triple = Triple::default();
    Decoder::new("rec", provider, converter)
        .decode(&mut triple)
        .unwrap();
    assert_eq!(triple.second, "two!");
}

#[derive(Debug, Default, PartialEq)]
struct User {
    name: String,
    age: u32,
    email: String,
}

inflate::record!(User {
    name => { "field": "name" },
    age => { "field": "age" },
    email,
});

#[derive(Debug, Default, PartialEq)]
struct Profile {
    username: String,
    age: u32,
    bio: String,
}

inflate::record!(Profile {
    username => { "field": "name" },
    age => { "field": "age" },
    bio,
});

#[test]
fn test_set_copies_matching_fields() {
    let user = User {
        name: "ada".into(),
        age: 36,
        email: "ada@example.com".into(),
    };
    let mut profile = Profile {
        username: "old".into(),
        age: 1,
        bio: "keep".into(),
    };
    inflate::set(&user, &mut profile).unwrap();
    assert_eq!(
        profile,
        Profile {
            username: "ada".into(),
            age: 36,
            bio: "keep".into(),
        }
    );
}

#[test]
fn test_set_between_scalars() {
    let mut port = 0u16;
    inflate::set(&"8080".to_string(), &mut port).unwrap();
    assert_eq!(port, 8080);
}

/// Never has anything to supply.
struct Empty;

impl Provider for Empty {
    fn value(&self, _ctx: &Context<'_>) -> inflate::Result<Option<Value>> {
        Ok(None)
    }
}

/// Remembers the source of every call, then defers to the structural converter.
#[derive(Default)]
struct Logging {
    sources: RefCell<Vec<Option<Value>>>,
}

impl Converter for Logging {
    fn convert(&self, source: Option<&Value>, target: &mut dyn FieldValue) -> inflate::Result<()> {
        self.sources.borrow_mut().push(source.cloned());
        StructConverter::new("rec").convert(source, target)
    }
}

#[derive(Debug, Default, PartialEq)]
struct Pair {
    a: String,
    b: u32,
}

inflate::record!(Pair {
    a => { "rec": "a" },
    b => { "rec": "b" },
});

#[test]
fn test_absent_values_still_reach_the_converter() {
    let converter = Logging::default();
    let mut pair = Pair {
        a: "x".into(),
        b: 3,
    };
    Decoder::new("rec", Empty, &converter)
        .decode(&mut pair)
        .unwrap();

    assert_eq!(*converter.sources.borrow(), vec![None, None]);
    assert_eq!(
        pair,
        Pair {
            a: "x".into(),
            b: 3
        }
    );
}

#[derive(Debug, Default, PartialEq)]
struct Pool {
    size: u32,
    name: String,
    note: String,
}

inflate::record!(Pool {
    size => { "default": "10" },
    name => { "default": "main" },
    note,
});

#[derive(Debug, Default, PartialEq)]
struct Service {
    pool: Pool,
}

inflate::record!(Service {
    pool => { "default": "~" },
});

fn tuned_service() -> Service {
    Service {
        pool: Pool {
            size: 4,
            name: String::new(),
            note: "hand-tuned".into(),
        },
    }
}

#[test]
fn test_flatten_in_place_keeps_nested_values() {
    let mut service = tuned_service();
    Decoder::new("default", DefaultProvider, StructConverter::new("default"))
        .decode(&mut service)
        .unwrap();
    assert_eq!(
        service.pool,
        Pool {
            size: 4,
            name: "main".into(),
            note: "hand-tuned".into(),
        }
    );
}

#[test]
fn test_flatten_into_fresh_record() {
    let mut service = tuned_service();
    Decoder::new("default", DefaultProvider, StructConverter::new("default"))
        .with_flatten_target(FlattenTarget::Fresh)
        .decode(&mut service)
        .unwrap();
    assert_eq!(
        service.pool,
        Pool {
            size: 10,
            name: "main".into(),
            note: String::new(),
        }
    );
}

#[test]
fn test_flatten_into_fresh_record_is_all_or_nothing() {
    #[derive(Debug, Default, PartialEq)]
    struct Bad {
        size: u32,
        count: u8,
    }

    inflate::record!(Bad {
        size => { "default": "10" },
        count => { "default": "999" },
    });

    #[derive(Debug, Default, PartialEq)]
    struct Holder {
        bad: Bad,
    }

    inflate::record!(Holder {
        bad => { "default": "~" },
    });

    let mut holder = Holder::default();
    let err = Decoder::new("default", DefaultProvider, StructConverter::new("default"))
        .with_flatten_target(FlattenTarget::Fresh)
        .decode(&mut holder)
        .unwrap_err();
    assert!(matches!(err, DecodeError::Conversion { type_name: "u8", .. }));
    assert_eq!(holder.bad, Bad::default());

    // decoded in place, the earlier nested field stays written
    let mut holder = Holder::default();
    Decoder::new("default", DefaultProvider, StructConverter::new("default"))
        .decode(&mut holder)
        .unwrap_err();
    assert_eq!(holder.bad.size, 10);
}

#[test]
fn test_decoder_accessors_and_walk() {
    let decoder = Decoder::new("rec", Recording::default(), StructConverter::new("rec"));
    assert_eq!(decoder.tag_name(), "rec");

    let mut triple = Triple::default();
    decoder.decode(&mut triple).unwrap();
    assert_eq!(decoder.provider().seen.borrow().len(), 3);

    {
        let walked = inflate::walk(decoder.tag_name(), &mut triple);
        assert_eq!(walked.len(), 3);
        assert!(!walked.is_empty());
    }
    assert!(inflate::walk("default", &mut triple).is_empty());
}
