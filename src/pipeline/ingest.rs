// src/pipeline/ingest.rs

//! Route → direction → stop ingestion.
//!
//! One run walks the site top-down: the routes page, then each route's
//! directions page, then each direction's stops page. Directions and stops
//! are shared between routes and kept once (first occurrence wins); every
//! (route, direction, stop) triple becomes a link. The four collections are
//! saved together at the end, or not at all.

use std::sync::Arc;

use futures::{StreamExt, stream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{AppError, Result};
use crate::models::{BusData, IngestSummary, ProgressEvent, RouteStopLink, Stage};
use crate::pipeline::dedup::FirstSeen;
use crate::pipeline::progress::{ChannelSink, ProgressSink};
use crate::services::{PageFetcher, TransitLoader};
use crate::storage::{DataStore, SaveSummary};

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: IngestSummary,
    /// None when there was nothing to save (no routes)
    pub saved: Option<SaveSummary>,
}

/// Terminal status of a run.
#[derive(Debug)]
pub enum RunStatus {
    Succeeded(RunReport),
    Failed(AppError),
}

impl RunStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Succeeded(_))
    }

    /// Terminal stage of the run.
    pub fn stage(&self) -> Stage {
        match self {
            RunStatus::Succeeded(_) => Stage::Succeeded,
            RunStatus::Failed(_) => Stage::Failed,
        }
    }

    pub fn into_result(self) -> Result<RunReport> {
        match self {
            RunStatus::Succeeded(report) => Ok(report),
            RunStatus::Failed(e) => Err(e),
        }
    }
}

/// A run started with [`Ingestor::load_all`].
pub struct IngestHandle {
    /// Progress events in emission order; closes when the run ends
    pub events: mpsc::UnboundedReceiver<ProgressEvent>,
    task: JoinHandle<RunStatus>,
}

impl IngestHandle {
    /// Wait for the run to finish.
    pub async fn wait(self) -> RunStatus {
        match self.task.await {
            Ok(status) => status,
            Err(e) => RunStatus::Failed(AppError::Task(e.to_string())),
        }
    }
}

/// Drives the loaders and hands the result to a data store.
pub struct Ingestor<F, S> {
    loader: TransitLoader<F>,
    store: S,
    concurrency: usize,
}

impl<F: PageFetcher, S: DataStore> Ingestor<F, S> {
    pub fn new(loader: TransitLoader<F>, store: S) -> Self {
        Self {
            loader,
            store,
            concurrency: 1,
        }
    }

    /// Number of stop pages of one route that may be fetched ahead.
    /// Events, dedup, and errors still follow traversal order.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn loader(&self) -> &TransitLoader<F> {
        &self.loader
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Start a run on a background task, streaming progress through a channel.
    pub fn load_all(self: Arc<Self>) -> IngestHandle
    where
        F: 'static,
        S: 'static,
    {
        let (sink, events) = ChannelSink::channel();
        let task = tokio::spawn(async move { self.run(&sink).await });
        IngestHandle { events, task }
    }

    /// Run to completion or first error. Failures become one error event.
    pub async fn run(&self, sink: &dyn ProgressSink) -> RunStatus {
        let status = match self.ingest(sink).await {
            Ok(report) => RunStatus::Succeeded(report),
            Err(e) => {
                log::error!("Ingestion aborted: {}", e);
                sink.update(ProgressEvent::error(e.to_string()));
                RunStatus::Failed(e)
            }
        };
        log::debug!("Run ended: {:?}", status.stage());
        status
    }

    async fn ingest(&self, sink: &dyn ProgressSink) -> Result<RunReport> {
        sink.update(ProgressEvent::new(
            Stage::LoadingRoutes,
            "Loading route names",
            0,
        ));
        let routes = self.loader.load_routes().await?;

        if routes.is_empty() {
            sink.update(ProgressEvent::new(Stage::Finalizing, "No routes found", 100));
            return Ok(RunReport {
                summary: IngestSummary::default(),
                saved: None,
            });
        }

        let mut directions = FirstSeen::new();
        let mut stops = FirstSeen::new();
        let mut links = Vec::new();

        for route in &routes {
            sink.update(ProgressEvent::new(
                Stage::LoadingDirections,
                format!("Loading directions for {}", route.name),
                100,
            ));
            let route_directions = self.loader.load_directions(&route.number).await?;

            let numbers: Vec<u32> = route_directions.iter().map(|d| d.number).collect();
            let mut stop_pages = stream::iter(numbers)
                .map(|number| self.loader.load_stops(&route.number, number))
                .buffered(self.concurrency);

            for direction in route_directions.iter() {
                directions.insert(direction.number, direction.clone());

                sink.update(ProgressEvent::new(
                    Stage::LoadingStops,
                    format!("Loading stops for {} {}", route.name, direction.name),
                    100,
                ));
                let Some(page) = stop_pages.next().await else {
                    break;
                };

                for stop in page? {
                    links.push(RouteStopLink::new(
                        route.number.as_str(),
                        direction.number,
                        stop.number,
                    ));
                    stops.insert(stop.number, stop);
                }
            }
        }

        let data = BusData {
            routes,
            directions: directions.into_values(),
            stops: stops.into_values(),
            links,
        };
        let summary = data.summary();
        sink.update(ProgressEvent::new(Stage::Finalizing, summary.to_string(), 100));

        let saved = self.store.save_bus_data(&data).await?;
        log::info!("Ingestion complete: {} ({})", summary, saved.location);

        Ok(RunReport {
            summary,
            saved: Some(saved),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, Route, Stop};
    use crate::storage::MemoryStorage;
    use crate::test_support::{
        FailingStorage, RecordingSink, StaticFetcher, listing, source_config,
    };

    fn ingestor<S: DataStore>(fetcher: StaticFetcher, store: S) -> Ingestor<StaticFetcher, S> {
        let loader = TransitLoader::new(fetcher, &source_config()).unwrap();
        Ingestor::new(loader, store)
    }

    /// One route, two directions sharing stop 100.
    fn downtown_site() -> StaticFetcher {
        StaticFetcher::new()
            .with_page("routes.html", &listing("r", &[("01", "Downtown")]))
            .with_page(
                "direction01.html",
                &listing("d", &[("1", "North"), ("2", "South")]),
            )
            .with_page("direction01d1.html", &listing("s", &[("100", "Main St")]))
            .with_page(
                "direction01d2.html",
                &listing("s", &[("100", "Main St"), ("101", "Elm St")]),
            )
    }

    /// Two routes whose pages reuse direction 1 and stop 200 under different names.
    fn shared_site() -> StaticFetcher {
        StaticFetcher::new()
            .with_page(
                "routes.html",
                &listing("r", &[("02", "WHARNCLIFFE"), ("13", "WELLINGTON")]),
            )
            .with_page("direction02.html", &listing("d", &[("1", "EASTBOUND")]))
            .with_page(
                "direction13.html",
                &listing("d", &[("1", "EAST"), ("3", "NORTHBOUND")]),
            )
            .with_page(
                "direction02d1.html",
                &listing("s", &[("200", "KING AT RICHMOND"), ("201", "DUNDAS")]),
            )
            .with_page("direction13d1.html", &listing("s", &[("200", "KING ST")]))
            .with_page(
                "direction13d3.html",
                &listing("s", &[("300", "FANSHAWE"), ("200", "KING")]),
            )
    }

    #[tokio::test]
    async fn test_example_scenario() {
        let ingestor = ingestor(downtown_site(), MemoryStorage::new());
        let sink = RecordingSink::new();

        let report = ingestor.run(&sink).await.into_result().unwrap();

        let data = ingestor.store().data().unwrap();
        assert_eq!(data.routes, vec![Route::new("01", "Downtown")]);
        assert_eq!(
            data.directions,
            vec![Direction::new(1, "North"), Direction::new(2, "South")]
        );
        assert_eq!(
            data.stops,
            vec![Stop::new(100, "Main St"), Stop::new(101, "Elm St")]
        );
        assert_eq!(
            data.links,
            vec![
                RouteStopLink::new("01", 1, 100),
                RouteStopLink::new("01", 2, 100),
                RouteStopLink::new("01", 2, 101),
            ]
        );
        assert_eq!(report.summary.to_string(), "1 routes 2 directions 2 stops 3 links");
        assert_eq!(ingestor.store().save_count(), 1);

        assert_eq!(
            sink.messages(),
            vec![
                "Loading route names",
                "Loading directions for Downtown",
                "Loading stops for Downtown North",
                "Loading stops for Downtown South",
                "1 routes 2 directions 2 stops 3 links",
            ]
        );
        let percents: Vec<i32> = sink.events().iter().map(|e| e.percent).collect();
        assert_eq!(percents, vec![0, 100, 100, 100, 100]);
    }

    #[tokio::test]
    async fn test_first_seen_name_wins_across_routes() {
        let ingestor = ingestor(shared_site(), MemoryStorage::new());
        let status = ingestor.run(&RecordingSink::new()).await;
        assert!(status.is_success());

        let data = ingestor.store().data().unwrap();
        assert_eq!(
            data.directions,
            vec![Direction::new(1, "EASTBOUND"), Direction::new(3, "NORTHBOUND")]
        );
        assert_eq!(
            data.stops,
            vec![
                Stop::new(200, "KING AT RICHMOND"),
                Stop::new(201, "DUNDAS"),
                Stop::new(300, "FANSHAWE"),
            ]
        );
        assert!(data.dangling_links().is_empty());
    }

    #[tokio::test]
    async fn test_link_count_matches_stop_pages() {
        let ingestor = ingestor(shared_site(), MemoryStorage::new());
        ingestor.run(&RecordingSink::new()).await.into_result().unwrap();

        // 2 + 1 + 2 stops listed across the three (route, direction) pages
        let data = ingestor.store().data().unwrap();
        assert_eq!(data.links.len(), 5);
        assert_eq!(
            data.links
                .iter()
                .filter(|l| l.stop_number == 200)
                .count(),
            3
        );
    }

    #[tokio::test]
    async fn test_routes_processed_in_document_order() {
        let fetcher = StaticFetcher::new()
            .with_page(
                "routes.html",
                &listing("r", &[("03", "C"), ("01", "A"), ("02", "B")]),
            )
            .with_page("direction03.html", &listing("d", &[]))
            .with_page("direction01.html", &listing("d", &[]))
            .with_page("direction02.html", &listing("d", &[]));
        let ingestor = ingestor(fetcher, MemoryStorage::new());
        let sink = RecordingSink::new();
        ingestor.run(&sink).await.into_result().unwrap();

        let direction_messages: Vec<String> = sink
            .messages()
            .into_iter()
            .filter(|m| m.starts_with("Loading directions"))
            .collect();
        assert_eq!(
            direction_messages,
            vec![
                "Loading directions for C",
                "Loading directions for A",
                "Loading directions for B",
            ]
        );
    }

    #[tokio::test]
    async fn test_no_routes_is_success_without_save() {
        let fetcher = StaticFetcher::new().with_page("routes.html", "<html><body></body></html>");
        let ingestor = ingestor(fetcher, MemoryStorage::new());
        let sink = RecordingSink::new();

        let status = ingestor.run(&sink).await;
        assert_eq!(status.stage(), Stage::Succeeded);
        let report = status.into_result().unwrap();

        assert_eq!(report.summary, IngestSummary::default());
        assert!(report.saved.is_none());
        assert_eq!(ingestor.store().save_count(), 0);

        let last = sink.events().pop().unwrap();
        assert_eq!(last.message, "No routes found");
        assert_eq!(last.percent, 100);
        assert_eq!(last.stage, Stage::Finalizing);
    }

    #[tokio::test]
    async fn test_failure_mid_run_saves_nothing() {
        // Stop page for direction 2 is missing
        let fetcher = StaticFetcher::new()
            .with_page("routes.html", &listing("r", &[("01", "Downtown")]))
            .with_page(
                "direction01.html",
                &listing("d", &[("1", "North"), ("2", "South")]),
            )
            .with_page("direction01d1.html", &listing("s", &[("100", "Main St")]));
        let ingestor = ingestor(fetcher, MemoryStorage::new());
        let sink = RecordingSink::new();

        let status = ingestor.run(&sink).await;

        assert!(matches!(status, RunStatus::Failed(AppError::Transport { .. })));
        assert_eq!(status.stage(), Stage::Failed);
        assert_eq!(ingestor.store().save_count(), 0);

        let events = sink.events();
        let errors: Vec<_> = events.iter().filter(|e| e.is_error()).collect();
        assert_eq!(errors.len(), 1);
        assert!(events.last().unwrap().is_error());
        assert!(errors[0].message.contains("direction01d2.html"));
    }

    #[tokio::test]
    async fn test_malformed_href_aborts_run() {
        let fetcher = StaticFetcher::new()
            .with_page("routes.html", &listing("r", &[("01", "Downtown")]))
            .with_page(
                "direction01.html",
                r#"<a class="ada" title="North" href="stops?d=1">N</a>
                   <a class="ada" title="Broken" href="stops?dir=2">?</a>"#,
            );
        let ingestor = ingestor(fetcher, MemoryStorage::new());
        let sink = RecordingSink::new();

        let status = ingestor.run(&sink).await;

        assert!(matches!(status, RunStatus::Failed(AppError::Format(_))));
        assert_eq!(ingestor.store().save_count(), 0);
        // No stop page was requested for the direction that did parse
        assert!(
            !ingestor
                .loader()
                .fetcher()
                .requests()
                .iter()
                .any(|url| url.ends_with("direction01d1.html"))
        );
        let last = sink.events().pop().unwrap();
        assert_eq!(last.message, "unrecognized route URL format");
        assert_eq!(last.percent, crate::models::ERROR_PERCENT);
    }

    #[tokio::test]
    async fn test_persistence_failure_reported() {
        let ingestor = ingestor(downtown_site(), FailingStorage);
        let sink = RecordingSink::new();

        let status = ingestor.run(&sink).await;

        assert!(matches!(status, RunStatus::Failed(AppError::Persistence(_))));
        let events = sink.events();
        assert_eq!(events.len(), 6);
        assert_eq!(events[4].stage, Stage::Finalizing);
        assert!(events[5].is_error());
        assert_eq!(events[5].message, "Persistence error: disk full");
    }

    #[tokio::test]
    async fn test_prefetch_keeps_traversal_order() {
        let sequential = ingestor(shared_site(), MemoryStorage::new());
        let sequential_sink = RecordingSink::new();
        sequential.run(&sequential_sink).await.into_result().unwrap();

        let prefetching = ingestor(shared_site(), MemoryStorage::new()).with_concurrency(4);
        let prefetching_sink = RecordingSink::new();
        prefetching
            .run(&prefetching_sink)
            .await
            .into_result()
            .unwrap();

        assert_eq!(sequential_sink.messages(), prefetching_sink.messages());
        assert_eq!(sequential.store().data(), prefetching.store().data());
    }

    #[tokio::test]
    async fn test_prefetch_reports_first_failure_in_traversal_order() {
        // Stop page for direction 2 is missing; 1 and 3 are served
        let fetcher = StaticFetcher::new()
            .with_page("routes.html", &listing("r", &[("01", "Downtown")]))
            .with_page(
                "direction01.html",
                &listing("d", &[("1", "North"), ("2", "South"), ("3", "East")]),
            )
            .with_page("direction01d1.html", &listing("s", &[("100", "Main St")]))
            .with_page("direction01d3.html", &listing("s", &[("102", "Oak St")]));
        let ingestor = ingestor(fetcher, MemoryStorage::new()).with_concurrency(4);
        let sink = RecordingSink::new();

        let status = ingestor.run(&sink).await;

        assert!(matches!(status, RunStatus::Failed(AppError::Transport { .. })));
        assert_eq!(ingestor.store().save_count(), 0);

        let messages = sink.messages();
        assert_eq!(
            messages[..messages.len() - 1].to_vec(),
            vec![
                "Loading route names",
                "Loading directions for Downtown",
                "Loading stops for Downtown North",
                "Loading stops for Downtown South",
            ]
        );
        let last = sink.events().pop().unwrap();
        assert!(last.is_error());
        assert!(last.message.contains("direction01d2.html"));
    }

    #[tokio::test]
    async fn test_load_all_streams_events() {
        let ingestor = Arc::new(ingestor(downtown_site(), MemoryStorage::new()));
        let mut handle = Arc::clone(&ingestor).load_all();

        let mut messages = Vec::new();
        while let Some(event) = handle.events.recv().await {
            messages.push(event.message);
        }
        let status = handle.wait().await;

        assert!(status.is_success());
        assert_eq!(messages.first().unwrap(), "Loading route names");
        assert_eq!(messages.last().unwrap(), "1 routes 2 directions 2 stops 3 links");
        assert_eq!(ingestor.store().save_count(), 1);
    }
}
