//! Shared test helpers: a tiny blocking HTTP stub standing in for Keystone
//! and Octavia.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

pub struct Route {
    pub method: &'static str,
    pub target: String,
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl Route {
    pub fn get(target: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: "GET",
            target: target.into(),
            status: 200,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }
}

pub struct StubServer {
    pub base: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    /// Requests seen so far, as `METHOD target`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("lock").clone()
    }
}

/// Start a stub whose routes may refer to its own base URL.
pub fn serve(routes: impl FnOnce(&str) -> Vec<Route>) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let base = format!("http://{}", listener.local_addr().expect("addr"));
    let routes = routes(&base);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let Ok(read_half) = stream.try_clone() else {
                continue;
            };
            let mut reader = BufReader::new(read_half);
            let mut request_line = String::new();
            if reader.read_line(&mut request_line).is_err() {
                continue;
            }
            let mut content_length = 0usize;
            loop {
                let mut header = String::new();
                if reader.read_line(&mut header).is_err() || header.trim().is_empty() {
                    break;
                }
                let lower = header.to_ascii_lowercase();
                if let Some(value) = lower.strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
            let mut body = vec![0u8; content_length];
            let _ = reader.read_exact(&mut body);

            let mut parts = request_line.split_whitespace();
            let method = parts.next().unwrap_or("").to_string();
            let target = parts.next().unwrap_or("").to_string();
            seen.lock().expect("lock").push(format!("{method} {target}"));

            let route = routes
                .iter()
                .find(|route| route.method == method && route.target == target);
            let (status, headers, payload) = match route {
                Some(route) => (route.status, route.headers.clone(), route.body.clone()),
                None => (404, Vec::new(), r#"{"faultstring": "not found"}"#.to_string()),
            };
            let mut response = format!(
                "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
                payload.len()
            );
            for (name, value) in headers {
                response.push_str(&format!("{name}: {value}\r\n"));
            }
            response.push_str("\r\n");
            response.push_str(&payload);
            let _ = stream.write_all(response.as_bytes());
        }
    });

    StubServer { base, requests }
}

/// Keystone token route whose catalog points the load-balancer service at
/// `lb_url`.
pub fn keystone_route(lb_url: &str) -> Route {
    Route {
        method: "POST",
        target: "/v3/auth/tokens".to_string(),
        status: 201,
        headers: vec![("X-Subject-Token", "tok-123".to_string())],
        body: format!(
            r#"{{"token": {{
                "project": {{"id": "proj-1", "name": "web"}},
                "catalog": [{{
                    "type": "load-balancer",
                    "name": "octavia",
                    "endpoints": [{{"interface": "public", "region": "RegionOne", "url": "{lb_url}"}}]
                }}]
            }}}}"#
        ),
    }
}

pub fn load_balancers_json(items: &[(&str, &str)]) -> String {
    let items: Vec<String> = items
        .iter()
        .map(|(id, status)| {
            format!(r#"{{"id": "{id}", "name": "{id}", "operating_status": "{status}"}}"#)
        })
        .collect();
    format!(r#"{{"loadbalancers": [{}], "loadbalancers_links": []}}"#, items.join(","))
}

pub fn pools_json(ids: &[&str]) -> String {
    let items: Vec<String> = ids
        .iter()
        .map(|id| format!(r#"{{"id": "{id}", "name": "{id}"}}"#))
        .collect();
    format!(r#"{{"pools": [{}], "pools_links": []}}"#, items.join(","))
}

pub fn members_json(items: &[(&str, &str, &str)]) -> String {
    let items: Vec<String> = items
        .iter()
        .map(|(id, prov, oper)| {
            format!(
                r#"{{"id": "{id}", "name": "{id}", "provisioning_status": "{prov}", "operating_status": "{oper}"}}"#
            )
        })
        .collect();
    format!(r#"{{"members": [{}], "members_links": []}}"#, items.join(","))
}
