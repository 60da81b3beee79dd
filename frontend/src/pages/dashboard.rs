use crm_shared::DashboardStats;
use crm_shared::audit::{self, RECENT_ACTIVITY_LIMIT};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;
use crate::components::auth::CrmContext;
use crate::components::dashboard::{ActivityRow, BreakdownBars, MetricCard};
use crate::utils::SameList;

#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let ctx = use_context::<CrmContext>();
    let clients = ctx
        .as_ref()
        .map(|ctx| ctx.state.clients.clone())
        .unwrap_or_default();
    let stats = use_memo(SameList(clients), |clients| DashboardStats::compute(&clients.0));

    let Some(ctx) = ctx else {
        return html! {};
    };

    let status_series = stats.status_breakdown.series();
    let tmc_series = stats.tmc_counts.series();
    let sso_series = stats.sso_counts.series();

    html! {
        <div class="p-6 space-y-6">
            <div>
                <h1 class="text-2xl font-bold text-white">{"Dashboard"}</h1>
                <p class="text-gray-400">{"Overview of client onboardings"}</p>
            </div>

            <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-5 gap-4">
                <MetricCard
                    title="Total Onboardings"
                    value={stats.total_onboardings.to_string()}
                    color="blue"
                    breakdown_title="By status"
                    breakdown={status_series.clone()}
                />
                <MetricCard
                    title="TMCs"
                    value={stats.total_tmcs.to_string()}
                    color="green"
                    breakdown_title="Clients per TMC"
                    breakdown={tmc_series.clone()}
                />
                <MetricCard
                    title="SSO Systems"
                    value={stats.total_ssos.to_string()}
                    color="purple"
                    breakdown_title="Clients per SSO system"
                    breakdown={sso_series.clone()}
                />
                <MetricCard
                    title="Most Integrated TMC"
                    value={stats.most_integrated_tmc.clone()}
                    color="yellow"
                    breakdown_title="Clients per TMC"
                    breakdown={tmc_series}
                />
                <MetricCard
                    title="Most Integrated SSO"
                    value={stats.most_integrated_sso.clone()}
                    color="orange"
                    breakdown_title="Clients per SSO system"
                    breakdown={sso_series}
                />
            </div>

            <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
                <div class="bg-gray-800 rounded-lg border border-gray-700">
                    <div class="px-4 py-3 border-b border-gray-700">
                        <h3 class="text-lg font-medium text-white">{"Status Breakdown"}</h3>
                    </div>
                    <div class="p-4">
                        <BreakdownBars slices={status_series} empty_label="No clients yet" />
                    </div>
                </div>

                <div class="bg-gray-800 rounded-lg border border-gray-700 lg:col-span-2">
                    <div class="px-4 py-3 border-b border-gray-700 flex items-center justify-between">
                        <h3 class="text-lg font-medium text-white">{"Recent Activity"}</h3>
                        <Link<Route> to={Route::AuditLog} classes="text-sm text-blue-400 hover:text-blue-300">{"View all"}</Link<Route>>
                    </div>
                    <div class="divide-y divide-gray-700">
                        {
                            audit::recent(&ctx.state.audit_log, RECENT_ACTIVITY_LIMIT)
                                .iter()
                                .map(|entry| html! { <ActivityRow entry={entry.clone()} /> })
                                .collect::<Html>()
                        }
                        if ctx.state.audit_log.is_empty() {
                            <p class="p-4 text-gray-400 text-sm">{"No activity recorded yet"}</p>
                        }
                    </div>
                </div>
            </div>
        </div>
    }
}
