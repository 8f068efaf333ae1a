//! Client trait implementations for [`HttpCloudController`].

use reqwest::StatusCode;
use serde_json::json;

use super::wire::{
    ApplicationEntity, BuildpackEntity, CreateApplicationBody, CreateRouteBody, InstancesBody,
    JobEntity, OrganizationEntity, OrganizationQuotaEntity, PrivateDomainEntity, RouteEntity,
    SecurityGroupEntity, ServiceBrokerEntity, ServiceEntity, ServiceInstanceEntity,
    ServicePlanEntity, ServicePlanVisibilityEntity, SharedDomainEntity, SpaceEntity,
    SpaceQuotaEntity, StackEntity,
};
use super::{HttpCloudController, Request};
use crate::cloud_controller::{
    Application, ApplicationClient, ApplicationInstance, ApplicationUpdate, Buildpack,
    BuildpackClient, ClientFuture, Domain, DomainClient, Filter, Job, JobClient, Lifecycle,
    Organization, OrganizationClient, OrganizationQuota, Route, RouteClient, SecurityGroup,
    SecurityGroupClient, Service, ServiceBroker, ServiceClient, ServiceInstance, ServicePlan,
    ServicePlanVisibility, Space, SpaceClient, SpaceQuota, Stack, StackClient,
};
use crate::error::ApiError;
use crate::warnings::Warned;

/// Serialises a request body, reporting failures as decode errors.
fn to_json(body: impl serde::Serialize) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body).map_err(|error| ApiError::Decode {
        message: error.to_string(),
    })
}

const fn space_binding_segment(lifecycle: Lifecycle) -> &'static str {
    match lifecycle {
        Lifecycle::Running => "spaces",
        Lifecycle::Staging => "staging_spaces",
    }
}

const fn default_groups_segment(lifecycle: Lifecycle) -> &'static str {
    match lifecycle {
        Lifecycle::Running => "running_security_groups",
        Lifecycle::Staging => "staging_security_groups",
    }
}

impl JobClient for HttpCloudController {
    fn get_job(&self, job_guid: &str) -> ClientFuture<'_, Job> {
        Box::pin(self.fetch_resource::<JobEntity>(Request::get(format!("/v2/jobs/{job_guid}"))))
    }
}

impl ApplicationClient for HttpCloudController {
    fn get_application(&self, guid: &str) -> ClientFuture<'_, Application> {
        Box::pin(self.fetch_resource::<ApplicationEntity>(Request::get(format!("/v2/apps/{guid}"))))
    }

    fn get_applications(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<Application>> {
        Box::pin(self.fetch_all::<ApplicationEntity>(Request::get("/v2/apps").filters(filters)))
    }

    fn create_application(&self, application: &Application) -> ClientFuture<'_, Application> {
        let body = to_json(CreateApplicationBody::from(application));
        Box::pin(async move {
            match body {
                Ok(json) => {
                    self.fetch_resource::<ApplicationEntity>(Request::post("/v2/apps").json(json))
                        .await
                }
                Err(error) => Warned::bare(Err(error)),
            }
        })
    }

    fn update_application(&self, update: &ApplicationUpdate) -> ClientFuture<'_, Application> {
        let path = format!("/v2/apps/{}", update.guid);
        let body = to_json(update);
        Box::pin(async move {
            match body {
                Ok(json) => {
                    self.fetch_resource::<ApplicationEntity>(Request::put(path).json(json))
                        .await
                }
                Err(error) => Warned::bare(Err(error)),
            }
        })
    }

    fn get_application_instances(
        &self,
        guid: &str,
    ) -> ClientFuture<'_, Vec<ApplicationInstance>> {
        let request = Request::get(format!("/v2/apps/{guid}/instances"));
        Box::pin(async move {
            self.fetch::<InstancesBody>(request)
                .await
                .map(|result| result.map(InstancesBody::into_instances))
        })
    }

    fn delete_application(&self, guid: &str) -> ClientFuture<'_, Job> {
        Box::pin(self.fetch_resource::<JobEntity>(
            Request::delete(format!("/v2/apps/{guid}")).in_background(),
        ))
    }
}

impl RouteClient for HttpCloudController {
    fn get_routes(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<Route>> {
        Box::pin(self.fetch_all::<RouteEntity>(Request::get("/v2/routes").filters(filters)))
    }

    fn get_application_routes(&self, app_guid: &str) -> ClientFuture<'_, Vec<Route>> {
        Box::pin(self.fetch_all::<RouteEntity>(Request::get(format!("/v2/apps/{app_guid}/routes"))))
    }

    fn get_space_routes(&self, space_guid: &str) -> ClientFuture<'_, Vec<Route>> {
        Box::pin(
            self.fetch_all::<RouteEntity>(Request::get(format!("/v2/spaces/{space_guid}/routes"))),
        )
    }

    fn get_route_applications(&self, route_guid: &str) -> ClientFuture<'_, Vec<Application>> {
        Box::pin(
            self.fetch_all::<ApplicationEntity>(Request::get(format!(
                "/v2/routes/{route_guid}/apps"
            ))),
        )
    }

    fn create_route(&self, route: &Route, generate_port: bool) -> ClientFuture<'_, Route> {
        let body = to_json(CreateRouteBody::from(route));
        Box::pin(async move {
            let json = match body {
                Ok(json) => json,
                Err(error) => return Warned::bare(Err(error)),
            };
            let mut request = Request::post("/v2/routes").json(json);
            if generate_port {
                request = request.param("generate_port", "true");
            }
            self.fetch_resource::<RouteEntity>(request).await
        })
    }

    fn check_route(&self, route: &Route) -> ClientFuture<'_, bool> {
        let mut request = Request::get(format!("/v2/routes/reserved/domain/{}", route.domain_guid));
        if !route.host.is_empty() {
            request = request.param("host", route.host.as_str());
        }
        if !route.path.is_empty() {
            request = request.param("path", route.path.as_str());
        }
        if let Some(port) = route.port {
            request = request.param("port", port.to_string());
        }

        Box::pin(async move {
            self.send(request).await.map(|result| match result {
                Ok(response) => Ok(response.status == StatusCode::NO_CONTENT),
                Err(ApiError::ResourceNotFound { .. }) => Ok(false),
                Err(error) => Err(error),
            })
        })
    }

    fn map_route_to_application(
        &self,
        route_guid: &str,
        app_guid: &str,
    ) -> ClientFuture<'_, Route> {
        Box::pin(self.fetch_resource::<RouteEntity>(Request::put(format!(
            "/v2/routes/{route_guid}/apps/{app_guid}"
        ))))
    }

    fn unmap_route_from_application(
        &self,
        route_guid: &str,
        app_guid: &str,
    ) -> ClientFuture<'_, ()> {
        Box::pin(self.send_empty(Request::delete(format!(
            "/v2/routes/{route_guid}/apps/{app_guid}"
        ))))
    }

    fn delete_route(&self, guid: &str) -> ClientFuture<'_, Job> {
        Box::pin(self.fetch_resource::<JobEntity>(
            Request::delete(format!("/v2/routes/{guid}")).in_background(),
        ))
    }
}

impl DomainClient for HttpCloudController {
    fn get_shared_domain(&self, guid: &str) -> ClientFuture<'_, Domain> {
        Box::pin(
            self.fetch_resource::<SharedDomainEntity>(Request::get(format!(
                "/v2/shared_domains/{guid}"
            ))),
        )
    }

    fn get_private_domain(&self, guid: &str) -> ClientFuture<'_, Domain> {
        Box::pin(
            self.fetch_resource::<PrivateDomainEntity>(Request::get(format!(
                "/v2/private_domains/{guid}"
            ))),
        )
    }

    fn get_shared_domains(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<Domain>> {
        Box::pin(
            self.fetch_all::<SharedDomainEntity>(Request::get("/v2/shared_domains").filters(filters)),
        )
    }

    fn get_organization_private_domains(
        &self,
        org_guid: &str,
        filters: &[Filter],
    ) -> ClientFuture<'_, Vec<Domain>> {
        Box::pin(self.fetch_all::<PrivateDomainEntity>(
            Request::get(format!("/v2/organizations/{org_guid}/private_domains")).filters(filters),
        ))
    }
}

impl StackClient for HttpCloudController {
    fn get_stack(&self, guid: &str) -> ClientFuture<'_, Stack> {
        Box::pin(self.fetch_resource::<StackEntity>(Request::get(format!("/v2/stacks/{guid}"))))
    }
}

impl OrganizationClient for HttpCloudController {
    fn get_organization(&self, guid: &str) -> ClientFuture<'_, Organization> {
        Box::pin(
            self.fetch_resource::<OrganizationEntity>(Request::get(format!(
                "/v2/organizations/{guid}"
            ))),
        )
    }

    fn get_organizations(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<Organization>> {
        Box::pin(
            self.fetch_all::<OrganizationEntity>(Request::get("/v2/organizations").filters(filters)),
        )
    }

    fn create_organization(
        &self,
        name: &str,
        quota_guid: &str,
    ) -> ClientFuture<'_, Organization> {
        let mut body = serde_json::Map::new();
        body.insert(String::from("name"), json!(name));
        if !quota_guid.is_empty() {
            body.insert(String::from("quota_definition_guid"), json!(quota_guid));
        }
        Box::pin(self.fetch_resource::<OrganizationEntity>(
            Request::post("/v2/organizations").json(serde_json::Value::Object(body)),
        ))
    }

    fn delete_organization(&self, guid: &str) -> ClientFuture<'_, Job> {
        Box::pin(
            self.fetch_resource::<JobEntity>(
                Request::delete(format!("/v2/organizations/{guid}"))
                    .param("recursive", "true")
                    .in_background(),
            ),
        )
    }

    fn get_organization_quota(&self, guid: &str) -> ClientFuture<'_, OrganizationQuota> {
        Box::pin(
            self.fetch_resource::<OrganizationQuotaEntity>(Request::get(format!(
                "/v2/quota_definitions/{guid}"
            ))),
        )
    }

    fn get_organization_quotas(
        &self,
        filters: &[Filter],
    ) -> ClientFuture<'_, Vec<OrganizationQuota>> {
        Box::pin(
            self.fetch_all::<OrganizationQuotaEntity>(
                Request::get("/v2/quota_definitions").filters(filters),
            ),
        )
    }
}

impl SpaceClient for HttpCloudController {
    fn get_spaces(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<Space>> {
        Box::pin(self.fetch_all::<SpaceEntity>(Request::get("/v2/spaces").filters(filters)))
    }

    fn create_space(&self, name: &str, org_guid: &str) -> ClientFuture<'_, Space> {
        let body = json!({ "name": name, "organization_guid": org_guid });
        Box::pin(self.fetch_resource::<SpaceEntity>(Request::post("/v2/spaces").json(body)))
    }

    fn delete_space(&self, guid: &str) -> ClientFuture<'_, Job> {
        Box::pin(
            self.fetch_resource::<JobEntity>(
                Request::delete(format!("/v2/spaces/{guid}"))
                    .param("recursive", "true")
                    .in_background(),
            ),
        )
    }

    fn get_space_quota(&self, guid: &str) -> ClientFuture<'_, SpaceQuota> {
        Box::pin(
            self.fetch_resource::<SpaceQuotaEntity>(Request::get(format!(
                "/v2/space_quota_definitions/{guid}"
            ))),
        )
    }

    fn get_space_quotas(&self, org_guid: &str) -> ClientFuture<'_, Vec<SpaceQuota>> {
        Box::pin(self.fetch_all::<SpaceQuotaEntity>(Request::get(format!(
            "/v2/organizations/{org_guid}/space_quota_definitions"
        ))))
    }

    fn set_space_quota(&self, space_guid: &str, quota_guid: &str) -> ClientFuture<'_, ()> {
        Box::pin(self.send_empty(Request::put(format!(
            "/v2/space_quota_definitions/{quota_guid}/spaces/{space_guid}"
        ))))
    }

    fn get_space_service_instances(
        &self,
        space_guid: &str,
        filters: &[Filter],
    ) -> ClientFuture<'_, Vec<ServiceInstance>> {
        Box::pin(
            self.fetch_all::<ServiceInstanceEntity>(
                Request::get(format!("/v2/spaces/{space_guid}/service_instances"))
                    .param("return_user_provided_service_instances", "true")
                    .filters(filters),
            ),
        )
    }

    fn get_space_security_groups(
        &self,
        space_guid: &str,
        lifecycle: Lifecycle,
        filters: &[Filter],
    ) -> ClientFuture<'_, Vec<SecurityGroup>> {
        let collection = match lifecycle {
            Lifecycle::Running => "security_groups",
            Lifecycle::Staging => "staging_security_groups",
        };
        Box::pin(
            self.fetch_all::<SecurityGroupEntity>(
                Request::get(format!("/v2/spaces/{space_guid}/{collection}")).filters(filters),
            ),
        )
    }
}

impl SecurityGroupClient for HttpCloudController {
    fn get_security_groups(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<SecurityGroup>> {
        Box::pin(
            self.fetch_all::<SecurityGroupEntity>(
                Request::get("/v2/security_groups").filters(filters),
            ),
        )
    }

    fn bind_security_group_to_space(
        &self,
        security_group_guid: &str,
        space_guid: &str,
        lifecycle: Lifecycle,
    ) -> ClientFuture<'_, ()> {
        let segment = space_binding_segment(lifecycle);
        Box::pin(self.send_empty(Request::put(format!(
            "/v2/security_groups/{security_group_guid}/{segment}/{space_guid}"
        ))))
    }

    fn unbind_security_group_from_space(
        &self,
        security_group_guid: &str,
        space_guid: &str,
        lifecycle: Lifecycle,
    ) -> ClientFuture<'_, ()> {
        let segment = space_binding_segment(lifecycle);
        Box::pin(self.send_empty(Request::delete(format!(
            "/v2/security_groups/{security_group_guid}/{segment}/{space_guid}"
        ))))
    }

    fn delete_security_group(&self, guid: &str) -> ClientFuture<'_, Job> {
        Box::pin(self.fetch_resource::<JobEntity>(
            Request::delete(format!("/v2/security_groups/{guid}")).in_background(),
        ))
    }

    fn set_security_group_globally_enabled(
        &self,
        security_group_guid: &str,
        lifecycle: Lifecycle,
        enabled: bool,
    ) -> ClientFuture<'_, ()> {
        let path = format!(
            "/v2/config/{}/{security_group_guid}",
            default_groups_segment(lifecycle)
        );
        let request = if enabled {
            Request::put(path)
        } else {
            Request::delete(path)
        };
        Box::pin(self.send_empty(request))
    }
}

impl ServiceClient for HttpCloudController {
    fn get_service_brokers(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<ServiceBroker>> {
        Box::pin(
            self.fetch_all::<ServiceBrokerEntity>(
                Request::get("/v2/service_brokers").filters(filters),
            ),
        )
    }

    fn get_services(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<Service>> {
        Box::pin(self.fetch_all::<ServiceEntity>(Request::get("/v2/services").filters(filters)))
    }

    fn get_service_plans(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<ServicePlan>> {
        Box::pin(
            self.fetch_all::<ServicePlanEntity>(Request::get("/v2/service_plans").filters(filters)),
        )
    }

    fn get_service_plan_visibilities(
        &self,
        filters: &[Filter],
    ) -> ClientFuture<'_, Vec<ServicePlanVisibility>> {
        Box::pin(
            self.fetch_all::<ServicePlanVisibilityEntity>(
                Request::get("/v2/service_plan_visibilities").filters(filters),
            ),
        )
    }
}

impl BuildpackClient for HttpCloudController {
    fn get_buildpacks(&self, filters: &[Filter]) -> ClientFuture<'_, Vec<Buildpack>> {
        Box::pin(self.fetch_all::<BuildpackEntity>(Request::get("/v2/buildpacks").filters(filters)))
    }

    fn create_buildpack(&self, buildpack: &Buildpack) -> ClientFuture<'_, Buildpack> {
        let body = to_json(buildpack);
        Box::pin(async move {
            match body {
                Ok(json) => {
                    self.fetch_resource::<BuildpackEntity>(Request::post("/v2/buildpacks").json(json))
                        .await
                }
                Err(error) => Warned::bare(Err(error)),
            }
        })
    }

    fn update_buildpack(&self, buildpack: &Buildpack) -> ClientFuture<'_, Buildpack> {
        let path = format!("/v2/buildpacks/{}", buildpack.guid);
        let body = to_json(buildpack);
        Box::pin(async move {
            match body {
                Ok(json) => {
                    self.fetch_resource::<BuildpackEntity>(Request::put(path).json(json))
                        .await
                }
                Err(error) => Warned::bare(Err(error)),
            }
        })
    }
}
