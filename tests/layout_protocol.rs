//! Integration tests for the layout definition protocol

use std::rc::Rc;

use pretty_assertions::assert_eq;

use page_layout::layout::{BodyAction, PageAction};
use page_layout::page::{Environment, NodePath, Value};
use page_layout::{
    Engine, EngineConfig, LayoutContext, LayoutDefinitionTag, LayoutError, Node, PageSet,
    ParamValue, Request,
};

fn no_params() -> Vec<(&'static str, &'static str)> {
    Vec::new()
}

fn home_pages() -> PageSet {
    PageSet::new()
        .with_page(
            "/index",
            vec![
                Node::text("<!-- before -->"),
                Node::render(
                    "/base",
                    [("title", "Home")],
                    vec![Node::component("header", vec![Node::text("<h1>Hi</h1>")])],
                ),
                Node::text("<!-- after -->"),
            ],
        )
        .and_then(|p| {
            p.with_page(
                "/base",
                vec![
                    Node::definition(vec![
                        Node::text("<title>"),
                        Node::attr("title"),
                        Node::text("</title>"),
                        Node::component("header", vec![Node::text("<h1>Default</h1>")]),
                        Node::text("<footer/>"),
                    ]),
                    Node::text("after definition"),
                ],
            )
        })
        .expect("Should register")
}

#[test]
fn test_home_page_renders_through_layout() {
    let html = Engine::new(home_pages()).render("/index").unwrap();
    assert_eq!(
        html,
        "<!-- before --><title>Home</title><h1>Hi</h1><footer/><!-- after -->"
    );
}

#[test]
fn test_definition_without_context_fails() {
    let err = Engine::new(home_pages()).render("/base").unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("/base"));
    assert!(matches!(err, LayoutError::DirectInvocation { .. }));
}

#[test]
fn test_start_publishes_and_end_balances() {
    let engine = Engine::new(home_pages());
    let request = Request::new();
    let render_env = Environment::root("/index");
    // The render node is the second node of /index.
    let ctx = LayoutContext::builder("/base", Rc::clone(&render_env))
        .at(NodePath::from(vec![1]))
        .parameter("title", "Home")
        .component("header")
        .build()
        .unwrap();
    let env = render_env.include("/base", Some(Rc::clone(&ctx)));

    let mut tag = LayoutDefinitionTag::new();
    assert_eq!(tag.start(&env, &request).unwrap(), BodyAction::EvalBodyInclude);

    match request.attribute("title") {
        Some(Value::Param(title)) => assert_eq!(title, ParamValue::from("Home")),
        other => panic!("expected title parameter, got {:?}", other),
    }
    let header = match request.attribute("header") {
        Some(Value::Component(renderer)) => renderer,
        other => panic!("expected header renderer, got {:?}", other),
    };
    assert!(ctx.is_rendered());

    header.render(&engine, &request).unwrap();
    assert_eq!(request.out().contents(), "<h1>Hi</h1>");

    assert_eq!(tag.end(&env, &request).unwrap(), PageAction::SkipPage);
    assert_eq!(header.stack_depth(), 0);
    assert!(!request.out().is_silent());
}

#[test]
fn test_component_phase_leaves_context_untouched() {
    let request = Request::new();
    let ctx = LayoutContext::builder("/base", Environment::root("/index"))
        .parameter("title", "Home")
        .component("header")
        .build()
        .unwrap();
    ctx.set_component_render_phase(true);
    let env = Environment::root("/index").include("/base", Some(Rc::clone(&ctx)));

    let mut tag = LayoutDefinitionTag::new();
    tag.start(&env, &request).unwrap();
    assert!(request.attribute("title").is_none());
    assert!(request.attribute("header").is_none());
    assert!(!ctx.is_rendered());
    assert!(request.out().is_silent());
    tag.end(&env, &request).unwrap();
    assert!(!request.out().is_silent());
}

#[test]
fn test_nested_definitions_balance_stacks() {
    let request = Request::new();
    let ctx = LayoutContext::builder("/base", Environment::root("/index"))
        .component("header")
        .component("footer")
        .build()
        .unwrap();
    let outer_env = Environment::root("/index").include("/base", Some(Rc::clone(&ctx)));
    let inner_env = outer_env.include("/base", Some(Rc::clone(&ctx)));

    let mut outer = LayoutDefinitionTag::new();
    let mut inner = LayoutDefinitionTag::new();
    outer.start(&outer_env, &request).unwrap();
    inner.start(&inner_env, &request).unwrap();

    for renderer in ctx.components().values() {
        assert_eq!(renderer.stack_depth(), 2);
        assert_eq!(renderer.current_environment().map(|e| Rc::ptr_eq(&e, &inner_env)), Some(true));
    }

    inner.end(&inner_env, &request).unwrap();
    for renderer in ctx.components().values() {
        assert_eq!(renderer.stack_depth(), 1);
    }
    outer.end(&outer_env, &request).unwrap();
    for renderer in ctx.components().values() {
        assert_eq!(renderer.stack_depth(), 0);
    }
}

#[test]
fn test_nested_definitions_restore_silent_like_a_stack() {
    let request = Request::new();
    let normal = LayoutContext::builder("/outer", Environment::root("/index"))
        .build()
        .unwrap();
    let reentry = LayoutContext::builder("/inner", Environment::root("/outer"))
        .build()
        .unwrap();
    reentry.set_component_render_phase(true);

    let outer_env = Environment::root("/index").include("/outer", Some(normal));
    let inner_env = outer_env.include("/inner", Some(reentry));

    let mut outer = LayoutDefinitionTag::new();
    let mut inner = LayoutDefinitionTag::new();
    outer.start(&outer_env, &request).unwrap();
    assert!(!request.out().is_silent());
    inner.start(&inner_env, &request).unwrap();
    assert!(request.out().is_silent());
    inner.end(&inner_env, &request).unwrap();
    assert!(!request.out().is_silent());
    outer.end(&outer_env, &request).unwrap();
    assert!(!request.out().is_silent());
}

#[test]
fn test_nothing_after_definition_is_written() {
    let html = Engine::new(home_pages()).render("/index").unwrap();
    assert!(!html.contains("after definition"));
}

#[test]
fn test_nested_layouts_forward_components() {
    let pages = PageSet::new()
        .with_page(
            "/index",
            vec![Node::render(
                "/two-column",
                [("title", "Docs")],
                vec![
                    Node::component("left", vec![Node::text("nav")]),
                    Node::component("right", vec![Node::text("body")]),
                ],
            )],
        )
        .and_then(|p| {
            p.with_page(
                "/two-column",
                vec![Node::definition(vec![Node::render(
                    "/base",
                    no_params(),
                    vec![Node::component(
                        "content",
                        vec![
                            Node::text("<aside>"),
                            Node::component("left", vec![]),
                            Node::text("</aside><article>"),
                            Node::component("right", vec![]),
                            Node::text("</article>"),
                        ],
                    )],
                )])],
            )
        })
        .and_then(|p| {
            p.with_page(
                "/base",
                vec![Node::definition(vec![
                    Node::text("<h1>"),
                    Node::attr("title"),
                    Node::text("</h1>"),
                    Node::component("content", vec![Node::text("empty")]),
                ])],
            )
        })
        .unwrap();

    let html = Engine::new(pages).render("/index").unwrap();
    assert_eq!(
        html,
        "<h1>Docs</h1><aside>nav</aside><article>body</article>"
    );
}

#[test]
fn test_component_attribute_renders_override() {
    let pages = PageSet::new()
        .with_page(
            "/index",
            vec![Node::render(
                "/base",
                no_params(),
                vec![Node::component("header", vec![Node::text("H")])],
            )],
        )
        .and_then(|p| {
            p.with_page(
                "/base",
                vec![Node::definition(vec![
                    Node::attr("header"),
                    Node::text("|"),
                    Node::attr("header"),
                ])],
            )
        })
        .unwrap();

    assert_eq!(Engine::new(pages).render("/index").unwrap(), "H|H");
}

#[test]
fn test_override_can_render_its_own_layout() {
    let pages = PageSet::new()
        .with_page(
            "/index",
            vec![Node::render(
                "/base",
                no_params(),
                vec![Node::component(
                    "body",
                    vec![Node::render(
                        "/card",
                        [("label", "inner")],
                        vec![],
                    )],
                )],
            )],
        )
        .and_then(|p| {
            p.with_page(
                "/base",
                vec![Node::definition(vec![
                    Node::text("<body>"),
                    Node::component("body", vec![]),
                    Node::text("</body>"),
                ])],
            )
        })
        .and_then(|p| {
            p.with_page(
                "/card",
                vec![Node::definition(vec![
                    Node::text("<div>"),
                    Node::attr("label"),
                    Node::text("</div>"),
                ])],
            )
        })
        .unwrap();

    assert_eq!(
        Engine::new(pages).render("/index").unwrap(),
        "<body><div>inner</div></body>"
    );
}

#[test]
fn test_pooled_handlers_render_identically() {
    let engine = Engine::new(home_pages());
    let first = engine.render("/index").unwrap();
    let idle = engine.tag_pool().idle();
    assert!(idle >= 1);

    let second = engine.render("/index").unwrap();
    assert_eq!(first, second);
    assert_eq!(engine.tag_pool().idle(), idle);

    let unpooled = Engine::with_config(home_pages(), EngineConfig::new().with_pool_tags(false));
    assert_eq!(unpooled.render("/index").unwrap(), first);
    assert_eq!(unpooled.tag_pool().idle(), 0);
}

#[test]
fn test_handler_reuse_across_unrelated_contexts() {
    let mut tag = LayoutDefinitionTag::new();

    let a = LayoutContext::builder("/a", Environment::root("/one"))
        .parameter("title", "A")
        .component("x")
        .build()
        .unwrap();
    let env_a = Environment::root("/one").include("/a", Some(Rc::clone(&a)));
    let req_a = Request::new();
    tag.start(&env_a, &req_a).unwrap();
    tag.end(&env_a, &req_a).unwrap();

    let b = LayoutContext::builder("/b", Environment::root("/two"))
        .build()
        .unwrap();
    b.set_component_render_phase(true);
    let env_b = Environment::root("/two").include("/b", Some(Rc::clone(&b)));
    let req_b = Request::new();
    tag.start(&env_b, &req_b).unwrap();
    assert!(tag.is_component_render_phase());
    assert!(!b.is_rendered());
    assert!(req_b.attribute("title").is_none());
    assert!(req_b.attribute("x").is_none());
    tag.end(&env_b, &req_b).unwrap();

    assert!(a.is_rendered());
    assert_eq!(a.component("x").map(|r| r.stack_depth()), Some(0));
}

#[test]
fn test_body_failure_still_restores_output_mode() {
    let pages = PageSet::new()
        .with_page(
            "/index",
            vec![Node::render(
                "/base",
                no_params(),
                vec![Node::component("header", vec![])],
            )],
        )
        .and_then(|p| {
            p.with_page(
                "/base",
                vec![Node::definition(vec![
                    Node::text("start"),
                    Node::render("/missing", no_params(), vec![]),
                ])],
            )
        })
        .unwrap();
    let engine = Engine::new(pages);

    let request = Request::new();
    request.out().set_silent(true);
    let err = engine.render_into(&request, "/index").unwrap_err();
    assert!(matches!(err, LayoutError::PageNotFound { ref path } if path == "/missing"));
    assert!(request.out().is_silent());
    assert_eq!(request.out().contents(), "start");
    assert_eq!(engine.tag_pool().idle(), 1);

    // The pooled handler is clean for the next request.
    let again = Request::new();
    assert!(engine.render_into(&again, "/index").is_err());
    assert!(!again.out().is_silent());
}

#[test]
fn test_override_renders_layout_with_its_own_components() {
    let pages = PageSet::new()
        .with_page(
            "/index",
            vec![Node::render(
                "/base",
                no_params(),
                vec![Node::component(
                    "body",
                    vec![Node::render(
                        "/card",
                        no_params(),
                        vec![Node::component("label", vec![Node::text("X")])],
                    )],
                )],
            )],
        )
        .and_then(|p| {
            p.with_page(
                "/base",
                vec![Node::definition(vec![
                    Node::text("<body>"),
                    Node::component("body", vec![]),
                    Node::text("</body>"),
                ])],
            )
        })
        .and_then(|p| {
            p.with_page(
                "/card",
                vec![Node::definition(vec![
                    Node::text("<div>"),
                    Node::component("label", vec![Node::text("default")]),
                    Node::text("</div>"),
                ])],
            )
        })
        .unwrap();

    assert_eq!(
        Engine::new(pages).render("/index").unwrap(),
        "<body><div>X</div></body>"
    );
}

fn box_pages() -> PageSet {
    PageSet::new()
        .with_page(
            "/index",
            vec![
                Node::render(
                    "/box",
                    no_params(),
                    vec![Node::component("c", vec![Node::text("A")])],
                ),
                Node::render(
                    "/box",
                    no_params(),
                    vec![Node::component("c", vec![Node::text("B")])],
                ),
            ],
        )
        .and_then(|p| {
            p.with_page(
                "/box",
                vec![Node::definition(vec![
                    Node::text("["),
                    Node::component("c", vec![]),
                    Node::text("]"),
                ])],
            )
        })
        .unwrap()
}

#[test]
fn test_same_layout_rendered_twice_keeps_overrides_apart() {
    assert_eq!(Engine::new(box_pages()).render("/index").unwrap(), "[A][B]");
}

#[test]
fn test_component_attribute_after_layout_writes_nothing() {
    let pages = box_pages();
    let mut nodes = pages.get("/index").unwrap().nodes.clone();
    nodes.push(Node::attr("c"));
    let pages = PageSet::new()
        .with_page("/index", nodes)
        .and_then(|p| p.with_page("/box", pages.get("/box").unwrap().nodes.clone()))
        .unwrap();

    let request = Request::new();
    Engine::new(pages).render_into(&request, "/index").unwrap();
    assert_eq!(request.out().contents(), "[A][B]");
    assert!(request.attribute("c").is_none());
}

#[test]
fn test_render_inside_default_component_body() {
    let pages = PageSet::new()
        .with_page(
            "/index",
            vec![Node::render(
                "/page",
                no_params(),
                vec![Node::component("title", vec![Node::text("T")])],
            )],
        )
        .and_then(|p| {
            p.with_page(
                "/page",
                vec![Node::definition(vec![
                    Node::text("<h1>"),
                    Node::component("title", vec![]),
                    Node::text("</h1>"),
                    Node::component(
                        "aside",
                        vec![Node::render(
                            "/box",
                            no_params(),
                            vec![Node::component("c", vec![Node::text("side")])],
                        )],
                    ),
                ])],
            )
        })
        .and_then(|p| {
            p.with_page(
                "/box",
                vec![Node::definition(vec![
                    Node::text("["),
                    Node::component("c", vec![]),
                    Node::text("]"),
                ])],
            )
        })
        .unwrap();

    assert_eq!(
        Engine::new(pages).render("/index").unwrap(),
        "<h1>T</h1>[side]"
    );
}
