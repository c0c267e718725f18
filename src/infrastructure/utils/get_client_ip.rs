use actix_web::{HttpRequest, http::header::USER_AGENT};

use crate::entities::contact::RequestOrigin;

/// Extract the client's IP address from the request, considering X-Forwarded-For if trusted
/// `trust_x_forwarded_for`: whether to trust the X-Forwarded-For header
pub fn get_client_ip(req: &HttpRequest, trust_x_forwarded_for: bool) -> Option<String> {
    if trust_x_forwarded_for {
        let forwarded = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|s| s.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty());
        if let Some(ip) = forwarded {
            return Some(ip.to_string());
        }
    }
    req.peer_addr().map(|addr| addr.ip().to_string())
}

/// Caller details stored with a contact submission.
pub fn request_origin(req: &HttpRequest, trust_x_forwarded_for: bool) -> RequestOrigin {
    RequestOrigin {
        ip_address: get_client_ip(req, trust_x_forwarded_for),
        user_agent: req
            .headers()
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn forwarded_header_is_ignored_unless_trusted() {
        let req = TestRequest::default()
            .insert_header(("x-forwarded-for", "203.0.113.7, 10.0.0.1"))
            .peer_addr("127.0.0.1:4000".parse().unwrap())
            .to_http_request();

        assert_eq!(get_client_ip(&req, false).as_deref(), Some("127.0.0.1"));
        assert_eq!(get_client_ip(&req, true).as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn origin_captures_user_agent() {
        let req = TestRequest::default()
            .insert_header((USER_AGENT, "curl/8.0"))
            .to_http_request();

        let origin = request_origin(&req, false);
        assert_eq!(origin.user_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(origin.ip_address, None);
    }
}
