mod chat_panel_scenarios;
