//! End-to-end HTTP flows against the full route table.

mod common;

use actix_web::http::{StatusCode, header};
use actix_web::test::{self, TestRequest};
use sea_orm::{ConnectionTrait, EntityTrait};
use serde_json::{Value, json};
use std::time::Duration;

use common::{bearer, login_req, multipart_body, multipart_content_type, png_bytes, register_req};

/// Register `$name` and return its access token.
macro_rules! token_for {
    ($app:expr, $name:expr) => {{
        let body: Value = test::call_and_read_body_json(
            &$app,
            register_req($name, &format!("{}@example.com", $name), "secret1").to_request(),
        )
        .await;
        body["accessToken"].as_str().unwrap().to_string()
    }};
}
use folio_backend::config::{AppConfig, RateLimitConfig};
use folio_backend::models::page_contents;

#[actix_web::test]
async fn test_register_seeds_empty_public_content() {
    let ctx = common::setup().await;
    let app = test_app!(ctx);

    let resp = test::call_service(
        &app,
        register_req("Alice1", "alice@example.com", "secret1").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["username"], "alice1");
    assert_eq!(body["tokenType"], "Bearer");
    assert!(body["accessToken"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body["user"].get("passwordHash").is_none());

    let req = TestRequest::get().uri("/api/content/Alice1").to_request();
    let content: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(content["username"], "alice1");
    assert_eq!(content["skills"], json!([]));
    assert_eq!(content["education"], json!([]));
    assert_eq!(content["portfolio"], json!([]));
    for field in ["name", "title", "bio", "about", "email", "phone", "location", "website"] {
        assert_eq!(content[field], "", "{field} should start empty");
    }
}

#[actix_web::test]
async fn test_duplicate_registration_conflicts() {
    let ctx = common::setup().await;
    let app = test_app!(ctx);

    let first = test::call_service(&app, register_req("bob", "bob@example.com", "secret1").to_request()).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let dup_name = test::call_service(&app, register_req("BOB", "other@example.com", "secret1").to_request()).await;
    assert_eq!(dup_name.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(dup_name).await;
    assert_eq!(body["statusCode"], 409);
    assert_eq!(body["error"], "Conflict");

    let dup_email = test::call_service(&app, register_req("bobby", "Bob@Example.com", "secret1").to_request()).await;
    assert_eq!(dup_email.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_invalid_registration_lists_every_problem() {
    let ctx = common::setup().await;
    let app = test_app!(ctx);

    let resp = test::call_service(&app, register_req("a!", "not-an-email", "123").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["statusCode"], 400);
    assert_eq!(body["message"].as_array().map(Vec::len), Some(3));
}

#[actix_web::test]
async fn test_login_failures_do_not_reveal_which_part_was_wrong() {
    let ctx = common::setup().await;
    let app = test_app!(ctx);
    test::call_service(&app, register_req("carol", "carol@example.com", "secret1").to_request()).await;

    let wrong_password = test::call_service(&app, login_req("carol", "nope-nope").to_request()).await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let a: Value = test::read_body_json(wrong_password).await;

    let unknown_user = test::call_service(&app, login_req("nobody", "nope-nope").to_request()).await;
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    let b: Value = test::read_body_json(unknown_user).await;
    assert_eq!(a, b);

    let by_email = test::call_service(&app, login_req("CAROL@example.com", "secret1").to_request()).await;
    assert_eq!(by_email.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_protected_routes_require_a_valid_token() {
    let ctx = common::setup().await;
    let app = test_app!(ctx);

    let resp = test::call_service(&app, TestRequest::get().uri("/api/auth/me").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/content/me")
            .insert_header(bearer("garbage"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_single_session_login_revokes_older_tokens() {
    let ctx = common::setup().await;
    let app = test_app!(ctx);
    let first = token_for!(app, "dave");

    let req = TestRequest::put()
        .uri("/api/auth/session-policy")
        .insert_header(bearer(&first))
        .set_json(json!({ "singleSession": true }))
        .to_request();
    let user: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(user["singleSession"], true);

    let login: Value = test::call_and_read_body_json(&app, login_req("dave", "secret1").to_request()).await;
    let second = login["accessToken"].as_str().unwrap().to_string();

    let me = |token: String| TestRequest::get().uri("/api/auth/me").insert_header(bearer(&token)).to_request();
    assert_eq!(test::call_service(&app, me(first)).await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(test::call_service(&app, me(second)).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_content_update_normalizes_image_references() {
    let ctx = common::setup().await;
    let app = test_app!(ctx);
    let token = token_for!(app, "erin");

    let req = TestRequest::put()
        .uri("/api/content/me")
        .insert_header(bearer(&token))
        .set_json(json!({
            "name": "Erin",
            "profileImage": "http://old-host:9000/portfolio/uploads/profile/a.png",
            "aboutImage": "/api/images/uploads/about/b.jpg",
            "skills": ["Rust", "  ", "SQL"],
            "portfolio": [
                { "title": "Site", "description": "d", "image": "uploads/portfolio/c.png" }
            ]
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["name"], "Erin");
    assert_eq!(
        body["profileImage"],
        "http://localhost:8080/api/images/uploads/profile/a.png"
    );
    assert_eq!(
        body["aboutImage"],
        "http://localhost:8080/api/images/uploads/about/b.jpg"
    );
    let skills: Vec<&str> = body["skills"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(skills, vec!["Rust", "SQL"]);
    assert_eq!(
        body["portfolio"][0]["image"],
        "http://localhost:8080/api/images/uploads/portfolio/c.png"
    );

    let rows = page_contents::Entity::find().all(&ctx.state.db).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].profile_image.as_deref(), Some("uploads/profile/a.png"));
    assert_eq!(rows[0].about_image.as_deref(), Some("uploads/about/b.jpg"));
}

#[actix_web::test]
async fn test_content_update_rejects_inline_portfolio_images_and_unknown_fields() {
    let ctx = common::setup().await;
    let app = test_app!(ctx);
    let token = token_for!(app, "frank");

    let inline = TestRequest::put()
        .uri("/api/content/me")
        .insert_header(bearer(&token))
        .set_json(json!({
            "portfolio": [{ "title": "x", "image": "data:image/png;base64,AAAA" }]
        }))
        .to_request();
    assert_eq!(test::call_service(&app, inline).await.status(), StatusCode::BAD_REQUEST);

    let unknown = TestRequest::put()
        .uri("/api/content/me")
        .insert_header(bearer(&token))
        .set_json(json!({ "nickname": "nope" }))
        .to_request();
    assert_eq!(test::call_service(&app, unknown).await.status(), StatusCode::BAD_REQUEST);

    // Nothing was half-applied.
    let req = TestRequest::get().uri("/api/content/frank").to_request();
    let content: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(content["portfolio"], json!([]));
}

#[actix_web::test]
async fn test_unknown_public_user_is_not_found() {
    let ctx = common::setup().await;
    let app = test_app!(ctx);
    for uri in ["/api/content/ghost", "/api/page/ghost", "/api/settings/ghost"] {
        let resp = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[actix_web::test]
async fn test_layout_and_widget_lifecycle() {
    let ctx = common::setup().await;
    let app = test_app!(ctx);
    let token = token_for!(app, "gina");

    let req = TestRequest::get()
        .uri("/api/layout")
        .insert_header(bearer(&token))
        .to_request();
    let layout: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(layout["widgets"].as_array().map(Vec::len), Some(5));
    assert_eq!(layout["widgets"][0]["type"], "hero");

    let req = TestRequest::post()
        .uri("/api/widgets")
        .insert_header(bearer(&token))
        .set_json(json!({ "type": "text", "title": "Note", "content": "hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let widget: Value = test::read_body_json(resp).await;
    let widget_id = widget["id"].as_str().unwrap().to_string();
    assert_eq!(widget["order"], 5);
    assert_eq!(widget["w"], 12);

    let bad = TestRequest::put()
        .uri(&format!("/api/widgets/{widget_id}"))
        .insert_header(bearer(&token))
        .set_json(json!({ "w": 13 }))
        .to_request();
    assert_eq!(test::call_service(&app, bad).await.status(), StatusCode::BAD_REQUEST);

    let hide = TestRequest::put()
        .uri(&format!("/api/widgets/{widget_id}"))
        .insert_header(bearer(&token))
        .set_json(json!({ "isVisible": false }))
        .to_request();
    let hidden: Value = test::call_and_read_body_json(&app, hide).await;
    assert_eq!(hidden["isVisible"], false);

    // The public view skips hidden widgets.
    let req = TestRequest::get().uri("/api/layout?username=gina").to_request();
    let public: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(public["widgets"].as_array().map(Vec::len), Some(5));

    let reorder = TestRequest::put()
        .uri("/api/widgets/reorder")
        .insert_header(bearer(&token))
        .set_json(json!({ "items": [{ "id": widget_id, "order": -1 }] }))
        .to_request();
    let ordered: Value = test::call_and_read_body_json(&app, reorder).await;
    assert_eq!(ordered[0]["id"], widget_id.as_str());

    let delete = TestRequest::delete()
        .uri(&format!("/api/widgets/{widget_id}"))
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, delete).await.status(), StatusCode::OK);

    // Someone else cannot touch it (and it is gone anyway).
    let other = token_for!(app, "hank");
    let req = TestRequest::delete()
        .uri(&format!("/api/widgets/{widget_id}"))
        .insert_header(bearer(&other))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_contact_inbox_is_private_to_the_recipient() {
    let ctx = common::setup().await;
    let app = test_app!(ctx);
    let owner = token_for!(app, "ivy");
    let stranger = token_for!(app, "jack");

    let req = TestRequest::post()
        .uri("/api/contact")
        .set_json(json!({
            "username": "IVY",
            "name": "Visitor",
            "email": "visitor@example.com",
            "message": "Hello there"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let id = created["id"].as_str().unwrap().to_string();

    let no_recipient = TestRequest::post()
        .uri("/api/contact")
        .set_json(json!({ "name": "V", "email": "v@example.com", "message": "hi" }))
        .to_request();
    assert_eq!(test::call_service(&app, no_recipient).await.status(), StatusCode::BAD_REQUEST);

    let unknown_recipient = TestRequest::post()
        .uri("/api/contact")
        .set_json(json!({ "username": "ghost", "name": "V", "email": "v@example.com", "message": "hi" }))
        .to_request();
    assert_eq!(test::call_service(&app, unknown_recipient).await.status(), StatusCode::NOT_FOUND);

    let req = TestRequest::get()
        .uri("/api/contact?unreadOnly=true")
        .insert_header(bearer(&owner))
        .to_request();
    let inbox: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(inbox.as_array().map(Vec::len), Some(1));
    assert_eq!(inbox[0]["isRead"], false);

    let req = TestRequest::get()
        .uri("/api/contact")
        .insert_header(bearer(&stranger))
        .to_request();
    let other_inbox: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(other_inbox, json!([]));

    let req = TestRequest::delete()
        .uri(&format!("/api/contact/{id}"))
        .insert_header(bearer(&stranger))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = TestRequest::put()
        .uri(&format!("/api/contact/{id}/read"))
        .insert_header(bearer(&owner))
        .to_request();
    let read: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(read["isRead"], true);

    let req = TestRequest::get()
        .uri("/api/contact?unreadOnly=true")
        .insert_header(bearer(&owner))
        .to_request();
    let unread: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(unread, json!([]));

    let req = TestRequest::delete()
        .uri(&format!("/api/contact/{id}"))
        .insert_header(bearer(&owner))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_upload_attaches_and_serves_the_image() {
    let ctx = common::setup().await;
    let app = test_app!(ctx);
    let token = token_for!(app, "kate");

    let req = TestRequest::post()
        .uri("/api/upload/profile")
        .insert_header(bearer(&token))
        .insert_header(multipart_content_type())
        .set_payload(multipart_body(&[("target", "about")], Some(("me.png", png_bytes().as_slice()))))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let uploaded: Value = test::read_body_json(resp).await;
    let key = uploaded["key"].as_str().unwrap().to_string();
    assert!(key.starts_with("uploads/profile/"));
    assert!(key.ends_with(".png"));
    assert_eq!(
        uploaded["url"],
        format!("http://localhost:8080/api/images/{key}")
    );

    let req = TestRequest::get().uri("/api/content/kate").to_request();
    let content: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(content["aboutImage"], uploaded["url"]);
    assert!(content["profileImage"].is_null());

    let resp = test::call_service(
        &app,
        TestRequest::get().uri(&format!("/api/images/{key}")).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/png"
    );
    let bytes = test::read_body(resp).await;
    assert_eq!(bytes.as_ref(), png_bytes().as_slice());

    let missing = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/images/uploads/profile/nope.png")
            .to_request(),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_upload_rejects_files_that_are_not_images() {
    let ctx = common::setup().await;
    let app = test_app!(ctx);
    let token = token_for!(app, "leo");

    let req = TestRequest::post()
        .uri("/api/upload/portfolio")
        .insert_header(bearer(&token))
        .insert_header(multipart_content_type())
        .set_payload(multipart_body(&[], Some(("evil.png", &b"#!/bin/sh\necho hi\n"[..]))))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = TestRequest::post()
        .uri("/api/upload/videos")
        .insert_header(bearer(&token))
        .insert_header(multipart_content_type())
        .set_payload(multipart_body(&[], Some(("a.png", png_bytes().as_slice()))))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    assert!(ctx.storage.is_empty().await);
}

#[actix_web::test]
async fn test_theme_config_override_round_trip() {
    let ctx = common::setup().await;
    let app = test_app!(ctx);
    let token = token_for!(app, "mia");

    let req = TestRequest::get().uri("/api/theme-config/mia").to_request();
    let before: Value = test::call_and_read_body_json(&app, req).await;
    let req = TestRequest::get().uri("/api/theme-config").to_request();
    let default: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(before, default);

    let req = TestRequest::put()
        .uri("/api/theme-config")
        .insert_header(bearer(&token))
        .set_json(json!({ "colors": { "primary": "#ff0000" } }))
        .to_request();
    let saved: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(saved["colors"]["primary"], "#ff0000");
    assert_eq!(saved["colors"]["secondary"], default["colors"]["secondary"]);

    // The cached "no override" marker must not hide the new file.
    let req = TestRequest::get().uri("/api/theme-config/mia").to_request();
    let after: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(after, saved);

    let req = TestRequest::put()
        .uri("/api/theme-config")
        .insert_header(bearer(&token))
        .set_json(json!({ "colors": { "primary": "red" } }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_theme_preference_is_owner_only() {
    let ctx = common::setup().await;
    let app = test_app!(ctx);
    let token = token_for!(app, "nina");
    token_for!(app, "omar");

    let req = TestRequest::get().uri("/api/theme/nina").to_request();
    let initial: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(initial["isCustom"], false);

    let req = TestRequest::put()
        .uri("/api/theme/omar")
        .insert_header(bearer(&token))
        .set_json(json!({ "primaryColor": "#000000" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = TestRequest::put()
        .uri("/api/theme/nina")
        .insert_header(bearer(&token))
        .set_json(json!({ "primaryColor": "#000000", "mode": "dark" }))
        .to_request();
    let saved: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(saved["primaryColor"], "#000000");
    assert_eq!(saved["mode"], "dark");
    assert_eq!(saved["isCustom"], true);
}

#[actix_web::test]
async fn test_settings_fall_back_to_defaults() {
    let ctx = common::setup().await;
    let app = test_app!(ctx);
    let token = token_for!(app, "pia");

    let req = TestRequest::get().uri("/api/settings").to_request();
    let defaults: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(defaults["siteTitle"], "My Portfolio");
    assert_eq!(defaults["isCustom"], false);

    let req = TestRequest::put()
        .uri("/api/settings")
        .insert_header(bearer(&token))
        .set_json(json!({ "siteTitle": "Pia's Work" }))
        .to_request();
    let saved: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(saved["siteTitle"], "Pia's Work");
    assert_eq!(saved["primaryColor"], defaults["primaryColor"]);

    let req = TestRequest::get().uri("/api/settings/pia").to_request();
    let public: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(public["siteTitle"], "Pia's Work");
    assert_eq!(public["isCustom"], true);
}

#[actix_web::test]
async fn test_updates_leave_an_edit_trail() {
    let ctx = common::setup().await;
    let app = test_app!(ctx);
    let token = token_for!(app, "quinn");

    let req = TestRequest::put()
        .uri("/api/profile")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "Engineer" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = TestRequest::get()
        .uri("/api/admin/edit-history?limit=10")
        .insert_header(bearer(&token))
        .to_request();
    let history: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(history["total"], 1);
    assert_eq!(history["items"][0]["page"], "profile");
    assert_eq!(history["items"][0]["action"], "update");
    assert_eq!(history["items"][0]["newValue"]["title"], "Engineer");

    let req = TestRequest::get().uri("/api/admin/edit-history").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_page_aggregates_everything_a_renderer_needs() {
    let ctx = common::setup().await;
    let app = test_app!(ctx);
    token_for!(app, "rosa");

    let req = TestRequest::get().uri("/api/page/Rosa").to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["content"]["username"], "rosa");
    assert_eq!(page["layout"]["widgets"].as_array().map(Vec::len), Some(5));
    assert!(page["theme"]["colors"].is_object());
    assert_eq!(page["themePreference"]["isCustom"], false);
    assert_eq!(page["settings"]["siteTitle"], "My Portfolio");
}

#[actix_web::test]
async fn test_health_reports_database_up() {
    let ctx = common::setup().await;
    let app = test_app!(ctx);
    let req = TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "up");
}

#[actix_web::test]
async fn test_anonymous_callers_are_throttled() {
    let mut config = AppConfig::for_tests(common::TEST_SECRET);
    config.rate_limit = RateLimitConfig {
        enabled: true,
        window: Duration::from_secs(60),
        max_anonymous: 2,
        max_authenticated: 5,
        sweep_interval: Duration::from_secs(60),
        trust_proxy: false,
    };
    let ctx = common::setup_with(config).await;
    let app = test_app!(ctx);

    for remaining in ["1", "0"] {
        let resp = test::call_service(&app, TestRequest::get().uri("/api/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("x-ratelimit-remaining").unwrap(), remaining);
    }

    let resp = test::call_service(&app, TestRequest::get().uri("/api/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().contains_key(header::RETRY_AFTER));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["statusCode"], 429);
}

#[actix_web::test]
async fn test_forwarded_headers_do_not_reset_the_window() {
    let mut config = AppConfig::for_tests(common::TEST_SECRET);
    config.rate_limit = RateLimitConfig {
        enabled: true,
        max_anonymous: 1,
        ..RateLimitConfig::default()
    };
    let ctx = common::setup_with(config).await;
    let app = test_app!(ctx);
    let peer: std::net::SocketAddr = "10.0.0.1:40000".parse().unwrap();

    let mut statuses = Vec::new();
    for i in 0..5 {
        let req = TestRequest::get()
            .uri("/api/health")
            .peer_addr(peer)
            .insert_header(("x-forwarded-for", format!("1.2.3.{i}")))
            .to_request();
        statuses.push(test::call_service(&app, req).await.status());
    }

    assert_eq!(statuses[0], StatusCode::OK);
    assert!(statuses[1..].iter().all(|s| *s == StatusCode::TOO_MANY_REQUESTS));
}

#[actix_web::test]
async fn test_trusted_proxy_keys_on_forwarded_client() {
    let mut config = AppConfig::for_tests(common::TEST_SECRET);
    config.rate_limit = RateLimitConfig {
        enabled: true,
        max_anonymous: 1,
        trust_proxy: true,
        ..RateLimitConfig::default()
    };
    let ctx = common::setup_with(config).await;
    let app = test_app!(ctx);
    let proxy: std::net::SocketAddr = "10.0.0.1:40000".parse().unwrap();

    for client in ["1.2.3.4", "5.6.7.8"] {
        let req = TestRequest::get()
            .uri("/api/health")
            .peer_addr(proxy)
            .insert_header(("x-forwarded-for", client))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }
}

#[actix_web::test]
async fn test_mutations_succeed_when_history_cannot_be_written() {
    let ctx = common::setup().await;
    let app = test_app!(ctx);
    let token = token_for!(app, "sam");

    let req = TestRequest::post()
        .uri("/api/widgets")
        .insert_header(bearer(&token))
        .set_json(json!({ "type": "text", "title": "Note" }))
        .to_request();
    let widget: Value = test::call_and_read_body_json(&app, req).await;
    let widget_id = widget["id"].as_str().unwrap().to_string();

    ctx.state
        .db
        .execute_unprepared("DROP TABLE edit_histories")
        .await
        .unwrap();

    let req = TestRequest::put()
        .uri("/api/profile")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "Designer" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let profile: Value = test::read_body_json(resp).await;
    assert_eq!(profile["title"], "Designer");

    let req = TestRequest::delete()
        .uri(&format!("/api/widgets/{widget_id}"))
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = TestRequest::get().uri("/api/content/sam").to_request();
    let content: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(content["title"], "Designer");
}
