
use reqwest::StatusCode;
use serde_json::{json, Value};
use test_utils::*;

#[actix_rt::test]
async fn create_project_applies_defaults() {
    let app = TestApp::spawn().await;

    let response = app.post_json("/api/projects", &project_body("Compiler")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Project created successfully");
    let project = &body["project"];
    assert_eq!(project["views"], 0);
    assert_eq!(project["likes"], 0);
    assert_eq!(project["status"], "Completed");
    assert_eq!(project["category"], "Full Stack");
    assert_eq!(project["difficulty"], "Intermediate");
    assert_eq!(project["featured"], false);
    assert!(project["id"].as_str().is_some());
}

#[actix_rt::test]
async fn create_project_without_required_fields_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json("/api/projects", &json!({ "description": "No title or image" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Validation failed");
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["image", "title"]);

    let list: Value = app.get("/api/projects").await.json().await.unwrap();
    assert_eq!(list["total"], 0);
}

#[actix_rt::test]
async fn create_project_rejects_unknown_status_label() {
    let app = TestApp::spawn().await;

    let mut body = project_body("Labels");
    body["status"] = json!("Abandoned");
    let response = app.post_json("/api/projects", &body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn viewing_a_project_counts_each_view() {
    let app = TestApp::spawn().await;
    let project = app.create_project(project_body("Viewed")).await;
    let path = format!("/api/projects/{}", project["id"].as_str().unwrap());

    for expected in 1..=3 {
        let response = app.get(&path).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["project"]["views"], expected);
    }
}

#[actix_rt::test]
async fn like_increments_by_one() {
    let app = TestApp::spawn().await;
    let project = app.create_project(project_body("Liked")).await;
    let path = format!("/api/projects/{}/like", project["id"].as_str().unwrap());

    let first: Value = app.post_json(&path, &json!({})).await.json().await.unwrap();
    let second: Value = app.post_json(&path, &json!({})).await.json().await.unwrap();

    assert_eq!(first["message"], "Project liked successfully");
    assert_eq!(first["likes"], 1);
    assert_eq!(second["likes"], 2);
}

#[actix_rt::test]
async fn concurrent_likes_are_all_counted() {
    let app = TestApp::spawn().await;
    let project = app.create_project(project_body("Popular")).await;
    let url = app.url(&format!("/api/projects/{}/like", project["id"].as_str().unwrap()));

    let requests: Vec<_> = (0..20)
        .map(|_| {
            let client = app.client.clone();
            let url = url.clone();
            tokio::spawn(async move { client.post(url).send().await })
        })
        .collect();
    for request in requests {
        assert_eq!(request.await.unwrap().unwrap().status(), StatusCode::OK);
    }

    let stats: Value = app.get("/api/projects/stats/overview").await.json().await.unwrap();
    assert_eq!(stats["totalLikes"], 20);
}

#[actix_rt::test]
async fn second_page_of_two_returns_items_three_and_four() {
    let app = TestApp::spawn().await;
    for n in 1..=5 {
        app.create_project(project_body(&format!("Project {}", n))).await;
    }

    let response = app.get("/api/projects?limit=2&page=2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();

    let titles: Vec<&str> = body["projects"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Project 3", "Project 2"]);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["currentPage"], 2);
    assert_eq!(body["total"], 5);
}

#[actix_rt::test]
async fn out_of_range_pagination_is_clamped() {
    let app = TestApp::spawn().await;
    app.create_project(project_body("Only")).await;

    let body: Value = app.get("/api/projects?page=0&limit=-4").await.json().await.unwrap();
    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["projects"].as_array().unwrap().len(), 1);
    assert_eq!(body["totalPages"], 1);
}

#[actix_rt::test]
async fn non_numeric_pagination_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/projects?page=abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["details"][0]["field"], "page");
}

#[actix_rt::test]
async fn list_filters_by_status_featured_and_search() {
    let app = TestApp::spawn().await;

    let mut wip = project_body("Realtime Chat");
    wip["status"] = json!("In Progress");
    wip["featured"] = json!(true);
    app.create_project(wip).await;

    let mut tracker = project_body("Habit Tracker");
    tracker["technologies"] = json!(["Flutter"]);
    app.create_project(tracker).await;

    let body: Value = app.get("/api/projects?status=in%20progress").await.json().await.unwrap();
    assert_eq!(body["total"], 1);
    assert_eq!(body["projects"][0]["title"], "Realtime Chat");

    let body: Value = app.get("/api/projects?featured=false").await.json().await.unwrap();
    assert_eq!(body["total"], 1);
    assert_eq!(body["projects"][0]["title"], "Habit Tracker");

    let body: Value = app.get("/api/projects?search=flut").await.json().await.unwrap();
    assert_eq!(body["total"], 1);
    assert_eq!(body["projects"][0]["title"], "Habit Tracker");

    let response = app.get("/api/projects?category=Desktop").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn featured_lists_at_most_six_newest_first() {
    let app = TestApp::spawn().await;
    for n in 1..=8 {
        let mut body = project_body(&format!("Featured {}", n));
        body["featured"] = json!(true);
        app.create_project(body).await;
    }
    app.create_project(project_body("Plain")).await;

    let body: Value = app.get("/api/projects/featured").await.json().await.unwrap();
    let projects = body["projects"].as_array().unwrap();
    assert_eq!(projects.len(), 6);
    assert_eq!(projects[0]["title"], "Featured 8");
    assert!(projects.iter().all(|p| p["featured"] == true));
}

#[actix_rt::test]
async fn partial_update_leaves_other_fields_untouched() {
    let app = TestApp::spawn().await;
    let before = app.create_project(project_body("Stable")).await;
    let path = format!("/api/projects/{}", before["id"].as_str().unwrap());

    let response = app.put_json(&path, &json!({ "featured": true })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Project updated successfully");

    let mut after = body["project"].clone();
    assert_eq!(after["featured"], true);

    for field in ["featured", "updatedAt"] {
        after[field] = before[field].clone();
    }
    assert_eq!(after, before);
}

#[actix_rt::test]
async fn update_can_clear_optional_fields_but_not_required_ones() {
    let app = TestApp::spawn().await;
    let mut body = project_body("Links");
    body["liveUrl"] = json!("https://links.example.com");
    let project = app.create_project(body).await;
    let path = format!("/api/projects/{}", project["id"].as_str().unwrap());

    let cleared: Value = app.put_json(&path, &json!({ "liveUrl": null })).await.json().await.unwrap();
    assert!(cleared["project"]["liveUrl"].is_null());

    let response = app.put_json(&path, &json!({ "title": null })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.put_json(&path, &json!({ "githubUrl": "ftp://example.com" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn missing_and_malformed_ids_are_not_found() {
    let app = TestApp::spawn().await;
    let missing = format!("/api/projects/{}", uuid::Uuid::new_v4());

    for path in [missing.as_str(), "/api/projects/not-a-uuid"] {
        let response = app.get(path).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Project not found");
    }

    assert_eq!(app.delete(&missing).await.status(), StatusCode::NOT_FOUND);
    let like = format!("{}/like", missing);
    assert_eq!(app.post_json(&like, &json!({})).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.put_json(&missing, &json!({ "featured": true })).await.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn delete_removes_the_project() {
    let app = TestApp::spawn().await;
    let project = app.create_project(project_body("Doomed")).await;
    let path = format!("/api/projects/{}", project["id"].as_str().unwrap());

    let response = app.delete(&path).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Project deleted successfully");

    assert_eq!(app.get(&path).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.delete(&path).await.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn stats_over_empty_store_are_zero() {
    let app = TestApp::spawn().await;

    let stats: Value = app.get("/api/projects/stats/overview").await.json().await.unwrap();

    assert_eq!(
        stats,
        json!({
            "totalProjects": 0,
            "featuredProjects": 0,
            "completedProjects": 0,
            "totalViews": 0,
            "totalLikes": 0
        })
    );
}

#[actix_rt::test]
async fn stats_aggregate_counters() {
    let app = TestApp::spawn().await;
    let mut featured = project_body("Featured");
    featured["featured"] = json!(true);
    let first = app.create_project(featured).await;
    let mut planned = project_body("Planned");
    planned["status"] = json!("Planning");
    app.create_project(planned).await;

    let id = first["id"].as_str().unwrap();
    app.get(&format!("/api/projects/{}", id)).await;
    app.get(&format!("/api/projects/{}", id)).await;
    app.post_json(&format!("/api/projects/{}/like", id), &json!({})).await;

    let stats: Value = app.get("/api/projects/stats/overview").await.json().await.unwrap();
    assert_eq!(stats["totalProjects"], 2);
    assert_eq!(stats["featuredProjects"], 1);
    assert_eq!(stats["completedProjects"], 1);
    assert_eq!(stats["totalViews"], 2);
    assert_eq!(stats["totalLikes"], 1);
}

#[actix_rt::test]
async fn malformed_json_body_is_a_bad_request() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/projects"))
        .header("content-type", "application/json")
        .body("{\"title\": ")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON payload"));
}
