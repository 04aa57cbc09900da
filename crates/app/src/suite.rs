//! Built-in `/posts` contract suite.
//!
//! Ten scenarios covering the CRUD surface of a json-server style
//! `/posts` collection: list and filter reads, creates on open and
//! protected routes, updates, deletes, and a full lifecycle chain.

use serde_json::json;

use attest_domain::{Assertion, Scenario, Step, StepExpectations, TypeTag};

fn new_post_body() -> serde_json::Value {
    json!({
        "title": "New Post",
        "body": "This is a new post.",
        "userId": 1
    })
}

fn updated_post_body() -> serde_json::Value {
    json!({
        "title": "Updated json-server",
        "author": "typicode"
    })
}

/// Returns the built-in scenarios in their canonical order.
#[must_use]
pub fn builtin_scenarios() -> Vec<Scenario> {
    vec![
        list_posts(),
        list_posts_returns_titled_posts(),
        filter_posts_by_id_set(),
        create_post(),
        create_post_on_protected_route(),
        create_post_and_verify_body(),
        update_existing_post(),
        create_then_update_post(),
        delete_missing_post(),
        post_lifecycle(),
    ]
}

fn list_posts() -> Scenario {
    Scenario::new("list posts")
        .with_description("GET /posts answers 200 with a JSON content type")
        .with_tag("read")
        .with_step(
            Step::get("list", "/posts").expecting(StepExpectations::status(200).assert(
                Assertion::HeaderContains {
                    name: "content-type".to_string(),
                    substring: "application/json".to_string(),
                },
            )),
        )
}

fn list_posts_returns_titled_posts() -> Scenario {
    Scenario::new("list posts returns titled posts")
        .with_description("every listed post carries a string title")
        .with_tag("read")
        .with_step(
            Step::get("list", "/posts").expecting(
                StepExpectations::status(200)
                    .assert(Assertion::BodyIsArray)
                    .assert(Assertion::BodyHasProperty {
                        name: "title".to_string(),
                        type_tag: TypeTag::String,
                    }),
            ),
        )
}

fn filter_posts_by_id_set() -> Scenario {
    Scenario::new("filter posts by id set")
        .with_description("repeated ?id= filters select exactly those posts, any order")
        .with_tag("read")
        .with_step(
            Step::get("filter", "/posts")
                .with_query("id", "55")
                .with_query("id", "60")
                .expecting(
                    StepExpectations::status(200)
                        .assert(Assertion::BodyIsArray)
                        .assert(Assertion::ArrayContains {
                            property: "id".to_string(),
                            value: json!(55),
                        })
                        .assert(Assertion::ArrayContains {
                            property: "id".to_string(),
                            value: json!(60),
                        }),
                ),
        )
}

fn create_post() -> Scenario {
    Scenario::new("create post")
        .with_description("POST /posts echoes the submitted fields back")
        .with_tag("create")
        .with_step(
            Step::post("create", "/posts")
                .with_body(new_post_body())
                .expecting(
                    StepExpectations::status(201)
                        .assert(Assertion::PropertyEquals {
                            name: "title".to_string(),
                            value: json!("New Post"),
                        })
                        .assert(Assertion::PropertyEquals {
                            name: "body".to_string(),
                            value: json!("This is a new post."),
                        })
                        .assert(Assertion::PropertyEquals {
                            name: "userId".to_string(),
                            value: json!(1),
                        }),
                ),
        )
}

fn create_post_on_protected_route() -> Scenario {
    Scenario::new("create post on protected route")
        .with_description("POST /664/posts may be rejected; the observed status is recorded")
        .with_tag("create")
        .with_step(
            Step::post("create", "/664/posts")
                .with_body(new_post_body())
                .expecting(StepExpectations::status(201).tolerant().assert(
                    Assertion::PropertyEquals {
                        name: "title".to_string(),
                        value: json!("New Post"),
                    },
                )),
        )
}

fn create_post_and_verify_body() -> Scenario {
    Scenario::new("create post and verify body")
        .with_description("strict create: 201 and the title must come back")
        .with_tag("create")
        .with_step(
            Step::post("create", "/posts")
                .with_body(new_post_body())
                .expecting(StepExpectations::status(201).assert(
                    Assertion::PropertyEquals {
                        name: "title".to_string(),
                        value: json!("New Post"),
                    },
                )),
        )
}

fn update_existing_post() -> Scenario {
    Scenario::new("update existing post")
        .with_description("PUT /posts/1 may 404 on a fresh server; recorded either way")
        .with_tag("update")
        .with_step(
            Step::put("update", "/posts/1")
                .with_body(updated_post_body())
                .expecting(StepExpectations::status(200).tolerant().assert(
                    Assertion::PropertyEquals {
                        name: "title".to_string(),
                        value: json!("Updated json-server"),
                    },
                )),
        )
}

fn create_then_update_post() -> Scenario {
    Scenario::new("create then update post")
        .with_description("the created id is captured and drives the update path")
        .with_tag("update")
        .with_step(
            Step::post("create", "/posts")
                .with_body(new_post_body())
                .expecting(StepExpectations::status(201))
                .capture("id", "/id"),
        )
        .with_step(
            Step::put("update", "/posts/{{id}}")
                .with_body(updated_post_body())
                .expecting(StepExpectations::status(200).assert(
                    Assertion::PropertyEquals {
                        name: "title".to_string(),
                        value: json!("Updated json-server"),
                    },
                )),
        )
}

fn delete_missing_post() -> Scenario {
    Scenario::new("delete missing post")
        .with_description("DELETE /posts/999 is expected to 404; observed status recorded")
        .with_tag("delete")
        .with_step(
            Step::delete("delete", "/posts/999")
                .expecting(StepExpectations::status(404).tolerant()),
        )
}

fn post_lifecycle() -> Scenario {
    Scenario::new("post lifecycle")
        .with_description("create, update, delete, then confirm the post is gone")
        .with_tag("lifecycle")
        .with_step(
            Step::post("create", "/posts")
                .with_body(new_post_body())
                .expecting(StepExpectations::status(201))
                .capture("id", "/id"),
        )
        .with_step(
            Step::put("update", "/posts/{{id}}")
                .with_body(updated_post_body())
                .expecting(StepExpectations::status(200)),
        )
        .with_step(
            Step::delete("delete", "/posts/{{id}}").expecting(StepExpectations::status(200)),
        )
        .with_step(
            Step::get("verify gone", "/posts/{{id}}").expecting(StepExpectations::status(404)),
        )
}
