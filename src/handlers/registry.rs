use super::collections::CollectionsHandler;
use super::filter::FilterHandler;
use super::geometry::GeometryHandler;
use super::json::ParseJsonHandler;
use super::search::SearchResultsHandler;
use super::sort::SortHandler;
use super::statistics::StatisticsHandler;
use super::traits::TaskHandler;
use crate::config::Config;
use crate::protocol::TaskType;
#[cfg(test)]
use std::sync::Arc;

/// Maps every task type to its handler.
///
/// Lookup is an exhaustive match, so adding a [`TaskType`] variant fails
/// to compile until a handler is wired in here.
#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    search: SearchResultsHandler,
    filter: FilterHandler,
    sort: SortHandler,
    collections: CollectionsHandler,
    statistics: StatisticsHandler,
    json: ParseJsonHandler,
    geometry: GeometryHandler,
    #[cfg(test)]
    substitute: Option<Arc<dyn TaskHandler>>,
}

impl HandlerRegistry {
    pub fn new(config: &Config) -> Self {
        Self {
            search: SearchResultsHandler::new(config.progress),
            geometry: GeometryHandler::new(config.geometry),
            ..Self::default()
        }
    }

    /// Route `handler.task_type()` to `handler` instead of the built-in one
    #[cfg(test)]
    pub(crate) fn with_handler(mut self, handler: Arc<dyn TaskHandler>) -> Self {
        self.substitute = Some(handler);
        self
    }

    pub fn get(&self, task_type: TaskType) -> &dyn TaskHandler {
        #[cfg(test)]
        if let Some(handler) = self
            .substitute
            .as_deref()
            .filter(|handler| handler.task_type() == task_type)
        {
            return handler;
        }

        match task_type {
            TaskType::ProcessSearchResults => &self.search,
            TaskType::FilterItems => &self.filter,
            TaskType::SortItems => &self.sort,
            TaskType::ProcessCollectionData => &self.collections,
            TaskType::CalculateStatistics => &self.statistics,
            TaskType::ParseLargeJson => &self.json,
            TaskType::ProcessGeometry => &self.geometry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_task_type_has_matching_handler() {
        let registry = HandlerRegistry::default();
        for task_type in TaskType::ALL {
            assert_eq!(registry.get(task_type).task_type(), task_type);
        }
    }

    #[test]
    fn test_config_reaches_handlers() {
        let mut config = Config::default();
        config.geometry.default_tolerance = 5.0;

        let registry = HandlerRegistry::new(&config);
        let output = registry
            .get(TaskType::ProcessGeometry)
            .handle(
                serde_json::json!({
                    "operation": "simplify",
                    "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 1], [2, 0], [2, 2], [0, 0]]]}
                }),
                &mut |_: u8| {},
            )
            .unwrap();
        // tolerance 5 collapses the ring to its endpoints
        assert_eq!(output["coordinates"][0].as_array().unwrap().len(), 2);
    }
}
