//! Optional Prometheus request metrics middleware.
//!
//! Wrapping the app in either variant yields the same boxed service type, so
//! the server can decide at startup whether `/metrics` is exposed.

use actix_service::{
    Service, ServiceExt as _, Transform,
    boxed::{self, BoxService},
};
use actix_web::body::BoxBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web_prom::PrometheusMetrics;
use futures_util::future::LocalBoxFuture;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) enum MetricsLayer {
    Enabled(Arc<PrometheusMetrics>),
    Disabled,
}

impl MetricsLayer {
    #[must_use]
    pub(crate) fn from_option(metrics: Option<PrometheusMetrics>) -> Self {
        metrics.map_or(Self::Disabled, |metrics| Self::Enabled(Arc::new(metrics)))
    }
}

type BoxedTransform = BoxService<ServiceRequest, ServiceResponse<BoxBody>, actix_web::Error>;

impl<S, B> Transform<S, ServiceRequest> for MetricsLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BoxedTransform;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        let Self::Enabled(metrics) = self.clone() else {
            return Box::pin(async move {
                let passthrough = service.map(|res: ServiceResponse<B>| res.map_into_boxed_body());
                Ok(boxed::service(passthrough))
            });
        };
        let pending = Compat::new((*metrics).clone()).new_transform(service);
        Box::pin(async move {
            let instrumented = pending.await?;
            Ok(boxed::service(instrumented))
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, HttpResponse, test, web};
    use actix_web_prom::PrometheusMetricsBuilder;

    use super::*;

    async fn call_metrics(layer: MetricsLayer) -> u16 {
        let app = test::init_service(
            App::new()
                .wrap(layer)
                .route("/ping", web::get().to(HttpResponse::Ok)),
        )
        .await;
        let _ = test::call_service(&app, test::TestRequest::get().uri("/ping").to_request()).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/metrics").to_request())
            .await;
        res.status().as_u16()
    }

    #[actix_web::test]
    async fn enabled_layer_serves_metrics_endpoint() {
        let prometheus = PrometheusMetricsBuilder::new("rides_test")
            .endpoint("/metrics")
            .build()
            .expect("metrics build");
        assert_eq!(call_metrics(MetricsLayer::from_option(Some(prometheus))).await, 200);
    }

    #[actix_web::test]
    async fn disabled_layer_passes_requests_through() {
        assert_eq!(call_metrics(MetricsLayer::from_option(None)).await, 404);
    }
}
