use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{header, Method},
    Error, HttpResponse,
};
use futures_util::future::LocalBoxFuture;

use crate::services::{AccessDecision, AccessGate};

/// Runs the access gate ahead of every handler: allow-list and role are
/// checked once per request, and denial happens before any workflow or
/// repository code is reached.
pub struct AccessControl {
    gate: AccessGate,
}

impl AccessControl {
    pub fn new(gate: AccessGate) -> Self {
        Self { gate }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AccessControl
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessControlMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessControlMiddleware {
            service: Rc::new(service),
            gate: Rc::new(self.gate.clone()),
        }))
    }
}

pub struct AccessControlMiddleware<S> {
    service: Rc<S>,
    gate: Rc<AccessGate>,
}

impl<S, B> Service<ServiceRequest> for AccessControlMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let gate = Rc::clone(&self.gate);

        Box::pin(async move {
            // Preflight requests carry no identity; CORS answers them.
            if req.method() == Method::OPTIONS {
                let res = service.call(req).await?;
                return Ok(res.map_into_left_body());
            }

            let path = req.path().to_string();
            let email = req
                .headers()
                .get("x-user-email")
                .and_then(|h| h.to_str().ok())
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty());

            match gate.decide(&path, email.as_deref()).await {
                AccessDecision::Permit => {
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                AccessDecision::RedirectTo(location) => {
                    let response = HttpResponse::Found()
                        .insert_header((header::LOCATION, location))
                        .finish();
                    Ok(req.into_response(response).map_into_right_body())
                }
                AccessDecision::DenyUnauthenticated => {
                    log::warn!("Denied unauthenticated request to {}", path);
                    let response = HttpResponse::Unauthorized()
                        .json(serde_json::json!({ "error": "Unauthorized access" }));
                    Ok(req.into_response(response).map_into_right_body())
                }
                AccessDecision::DenyForbidden => {
                    log::warn!("Denied forbidden request to {}", path);
                    let response = HttpResponse::Forbidden()
                        .json(serde_json::json!({ "error": "Forbidden" }));
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}
