use yew::prelude::*;

use crate::components::auth::CrmContext;
use crate::utils::format_timestamp;

/// Every audit entry, newest first, exactly as loaded.
#[function_component(AuditLogPage)]
pub fn audit_log_page() -> Html {
    let Some(ctx) = use_context::<CrmContext>() else {
        return html! {};
    };

    let client_name = |client_id: Option<&str>| -> String {
        match client_id {
            Some(id) => ctx
                .state
                .client(id)
                .map(|client| client.name.clone())
                .unwrap_or_else(|| id.to_string()),
            None => "-".to_string(),
        }
    };

    html! {
        <div class="p-6 space-y-4">
            <div>
                <h1 class="text-2xl font-bold text-white">{"Audit Log"}</h1>
                <p class="text-gray-400">{format!("{} entries", ctx.state.audit_log.len())}</p>
            </div>

            <div class="bg-gray-800 rounded-lg border border-gray-700 overflow-x-auto">
                <table class="min-w-full divide-y divide-gray-700">
                    <thead class="bg-gray-900">
                        <tr>
                            <th class="px-4 py-3 text-left text-xs font-medium text-gray-400 uppercase">{"When"}</th>
                            <th class="px-4 py-3 text-left text-xs font-medium text-gray-400 uppercase">{"Action"}</th>
                            <th class="px-4 py-3 text-left text-xs font-medium text-gray-400 uppercase">{"Client"}</th>
                            <th class="px-4 py-3 text-left text-xs font-medium text-gray-400 uppercase">{"Field"}</th>
                            <th class="px-4 py-3 text-left text-xs font-medium text-gray-400 uppercase">{"Old Value"}</th>
                            <th class="px-4 py-3 text-left text-xs font-medium text-gray-400 uppercase">{"New Value"}</th>
                            <th class="px-4 py-3 text-left text-xs font-medium text-gray-400 uppercase">{"User"}</th>
                        </tr>
                    </thead>
                    <tbody class="divide-y divide-gray-700">
                        { for ctx.state.audit_log.iter().map(|entry| html! {
                            <tr class="hover:bg-gray-700/50 text-sm">
                                <td class="px-4 py-2 text-gray-400 whitespace-nowrap">{format_timestamp(entry.created_at)}</td>
                                <td class="px-4 py-2 text-white whitespace-nowrap">{entry.action.as_str()}</td>
                                <td class="px-4 py-2 text-gray-300">{client_name(entry.client_id.as_deref())}</td>
                                <td class="px-4 py-2 text-gray-300">{&entry.field_name}</td>
                                <td class="px-4 py-2 text-gray-400 max-w-xs truncate">{&entry.old_value}</td>
                                <td class="px-4 py-2 text-gray-300 max-w-xs truncate">{&entry.new_value}</td>
                                <td class="px-4 py-2 text-gray-400">{entry.user_email.clone().unwrap_or_default()}</td>
                            </tr>
                        }) }
                    </tbody>
                </table>
                if ctx.state.audit_log.is_empty() {
                    <p class="p-6 text-center text-gray-400">{"No audit entries yet"}</p>
                }
            </div>
        </div>
    }
}
